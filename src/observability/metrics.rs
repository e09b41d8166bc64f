//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cors_proxy_requests_total` (counter): requests by kind, status
//! - `cors_proxy_request_duration_seconds` (histogram): time until the
//!   response head is ready, by kind
//!
//! `kind` is one of `preflight`, `forward`, `error`. Without an installed
//! recorder the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Preflight,
    Forward,
    Error,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Preflight => "preflight",
            RequestKind::Forward => "forward",
            RequestKind::Error => "error",
        }
    }
}

/// Install the Prometheus recorder and its scrape listener.
/// Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(kind: RequestKind, status: u16, started: Instant) {
    metrics::counter!(
        "cors_proxy_requests_total",
        "kind" => kind.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "cors_proxy_request_duration_seconds",
        "kind" => kind.as_str()
    )
    .record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(RequestKind::Preflight.as_str(), "preflight");
        assert_eq!(RequestKind::Forward.as_str(), "forward");
        assert_eq!(RequestKind::Error.as_str(), "error");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_request(RequestKind::Forward, 204, Instant::now());
    }
}
