//! Shared utilities for integration tests: mock upstreams and a proxy runner.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use cors_proxy::{HttpServer, ProxyConfig, Shutdown};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What a mock upstream saw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

/// A running proxy bound to an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the proxy in front of `upstream`, letting the test adjust config.
pub async fn start_proxy(upstream: SocketAddr, tweak: impl FnOnce(&mut ProxyConfig)) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.address = upstream.to_string();
    tweak(&mut config);

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestProxy { addr, shutdown, handle }
}

/// An address nothing listens on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// HTTP client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Serve `app` on an ephemeral port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Self-signed certificate and key for `localhost` and `127.0.0.1`, as PEM.
pub struct SelfSigned {
    pub cert_pem: String,
    pub key_pem: String,
}

impl SelfSigned {
    pub fn generate() -> Self {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
                .unwrap();
        Self {
            cert_pem: cert.pem(),
            key_pem: key_pair.serialize_pem(),
        }
    }

    /// Write cert and key to temp files; keep them alive while the proxy starts.
    pub fn write_files(&self) -> (NamedTempFile, NamedTempFile) {
        let mut cert = NamedTempFile::new().unwrap();
        cert.write_all(self.cert_pem.as_bytes()).unwrap();
        let mut key = NamedTempFile::new().unwrap();
        key.write_all(self.key_pem.as_bytes()).unwrap();
        (cert, key)
    }

    pub async fn rustls_config(&self) -> RustlsConfig {
        RustlsConfig::from_pem(self.cert_pem.clone().into_bytes(), self.key_pem.clone().into_bytes())
            .await
            .unwrap()
    }
}

/// Serve `app` over TLS with a self-signed certificate on an ephemeral port.
pub async fn serve_tls(app: Router) -> SocketAddr {
    let config = SelfSigned::generate().rustls_config().await;
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum_server::from_tcp_rustls(listener, config)
            .serve(app.into_make_service())
            .await;
    });
    addr
}

/// Upstream that records each request and answers with a fixed reply.
pub async fn start_recording_upstream(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> (SocketAddr, Log) {
    let (app, log) = recording_app(status, headers, body);
    (serve(app).await, log)
}

/// Like [`start_recording_upstream`], but speaking https with a self-signed certificate.
pub async fn start_recording_tls_upstream(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> (SocketAddr, Log) {
    let (app, log) = recording_app(status, headers, body);
    (serve_tls(app).await, log)
}

fn recording_app(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> (Router, Log) {
    let log: Log = Arc::default();
    let recorder = log.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorder = recorder.clone();
        async move {
            let (parts, body_in) = request.into_parts();
            let received = to_bytes(body_in, usize::MAX).await.unwrap_or_default();
            recorder.lock().unwrap().push(Recorded {
                method: parts.method,
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body: received,
            });

            let mut response = Response::builder().status(StatusCode::from_u16(status).unwrap());
            for (name, value) in headers {
                response = response.header(*name, *value);
            }
            response.body(Body::from(body)).unwrap()
        }
    });

    (app, log)
}

/// Upstream that sends the request body back.
pub async fn start_echo_upstream() -> SocketAddr {
    let app = Router::new().fallback(|request: Request<Body>| async move {
        Response::new(request.into_body())
    });
    serve(app).await
}

/// Upstream that waits `delay` before answering 200.
pub async fn start_slow_upstream(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "slow"
    });
    serve(app).await
}

/// Upstream speaking raw TCP: reads the request head, writes `reply`, closes.
pub async fn start_raw_upstream(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                let _ = socket.write_all(reply).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// Send `raw` to `addr` and return everything read until the peer closes.
pub async fn raw_request(addr: SocketAddr, raw: &str) -> String {
    let mut socket = tokio::net::TcpStream::connect(addr).await.unwrap();
    socket.write_all(raw.as_bytes()).await.unwrap();
    let mut out = Vec::new();
    let _ = socket.read_to_end(&mut out).await;
    String::from_utf8_lossy(&out).into_owned()
}

async fn read_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
