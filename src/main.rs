//! CORS Proxy
//!
//! Sits in front of a service that does not speak CORS.
//!
//! ```text
//!                      ┌───────────────────────────────────────────┐
//!                      │                CORS PROXY                 │
//!   OPTIONS request    │  ┌─────────┐    ┌────────────────────┐    │
//!   ───────────────────┼─▶│  http   │───▶│ cors: mirror       │    │
//!   ◀──────────────────┼──│ server  │◀───│ Request → Allow    │    │
//!                      │  │         │    └────────────────────┘    │
//!   other requests     │  │         │    ┌────────────────────┐    │   ┌──────────┐
//!   ───────────────────┼─▶│         │───▶│ request: rebuild   │────┼──▶│ upstream │
//!   ◀──────────────────┼──│         │◀───│ response: + CORS   │◀───┼───│          │
//!                      │  └─────────┘    └────────────────────┘    │   └──────────┘
//!                      └───────────────────────────────────────────┘
//! ```

use clap::Parser;
use cors_proxy::config::Args;
use cors_proxy::lifecycle::signals::spawn_signal_listener;
use cors_proxy::net::listener;
use cors_proxy::observability::{logging, metrics};
use cors_proxy::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Args::parse().into_config_with(|observability| {
        logging::init_logging(observability.verbose, &observability.log_level)
    });

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        listen = %config.listener.bind_address,
        upstream = %config.upstream.address,
        tls = config.listener.tls.as_ref().and_then(|tls| tls.paths()).is_some(),
        skip_cert_verification = config.upstream.skip_cert_verification,
        upstream_timeout_ms = ?config.upstream.timeout_ms,
        "Configuration loaded"
    );

    if let Some(address) = &config.observability.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => {
                tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address");
                std::process::exit(1);
            }
        }
    }

    let listener = listener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
