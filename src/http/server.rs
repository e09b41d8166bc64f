//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all proxy handler
//! - Serve plain HTTP or HTTPS (axum-server + rustls) on the listener
//! - Answer CORS preflights locally
//! - Forward every other request to the upstream and stream the reply
//! - Graceful shutdown on the broadcast signal

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::http::{cors, request, response};
use crate::lifecycle::shutdown;
use crate::net::tls::{load_tls_config, TlsError};
use crate::net::UpstreamClients;
use crate::observability::metrics::{self, RequestKind};
use crate::resilience::timeouts::with_deadline;

/// How long TLS connections get to finish after shutdown is signalled.
const TLS_DRAIN_GRACE: Duration = Duration::from_secs(10);

/// Error type for the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] rustls::Error),
}

/// Application state injected into the handler. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Upstream `host:port`, already normalized.
    pub upstream: Arc<str>,
    /// Whether requests arrive over TLS.
    pub secure: bool,
    pub skip_cert_verification: bool,
    pub upstream_timeout: Option<Duration>,
    pub clients: UpstreamClients,
}

impl AppState {
    /// State for `config`. `secure` reflects whether the listener is TLS.
    pub fn new(config: &ProxyConfig, secure: bool) -> Result<Self, ServerError> {
        Ok(Self {
            upstream: Arc::from(config.upstream.address.as_str()),
            secure,
            skip_cert_verification: config.upstream.skip_cert_verification,
            upstream_timeout: config.upstream.timeout_ms.map(Duration::from_millis),
            clients: UpstreamClients::new()?,
        })
    }
}

/// HTTP server for the CORS proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState::new(&config, tls_paths(&config).is_some())?;
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// The router, for serving on a custom transport or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        match tls_paths(&self.config) {
            Some((cert_path, key_path)) => {
                let rustls_config = load_tls_config(cert_path, key_path).await?;
                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    shutdown::wait(shutdown_rx).await;
                    drain.graceful_shutdown(Some(TLS_DRAIN_GRACE));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown::wait(shutdown_rx))
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Certificate and key when the listener serves TLS.
fn tls_paths(config: &ProxyConfig) -> Option<(&str, &str)> {
    config.listener.tls.as_ref().and_then(|tls| tls.paths())
}

/// Build the Axum router: every method on every path goes to the handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(proxy_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let url = request::target_url(state.secure, &state.upstream, request.uri());
    tracing::debug!(url = %url, "Create request");

    if cors::is_preflight(request.method()) {
        tracing::debug!(url = %url, "CORS preflight");
        let reply = response::preflight_response(request.headers());
        metrics::record_request(RequestKind::Preflight, reply.status().as_u16(), started);
        return reply;
    }

    match forward(&state, request, &url).await {
        Ok(upstream) => {
            metrics::record_request(RequestKind::Forward, upstream.status().as_u16(), started);
            response::relay(upstream, url)
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e.describe(), "Upstream error");
            let reply = response::error_response(&e);
            metrics::record_request(RequestKind::Error, reply.status().as_u16(), started);
            reply
        }
    }
}

/// Send the request upstream and wait for the response head.
async fn forward(
    state: &AppState,
    request: Request<Body>,
    url: &str,
) -> Result<axum::http::Response<hyper::body::Incoming>, ProxyError> {
    let outbound = request::build_outbound(request, url)?;
    let client = state.clients.select(state.secure, state.skip_cert_verification);
    with_deadline(state.upstream_timeout, async {
        client.request(outbound).await.map_err(ProxyError::from)
    })
    .await
}
