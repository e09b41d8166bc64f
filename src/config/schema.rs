//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the CORS proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The single upstream every non-preflight request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000"). An empty host binds all interfaces.
    pub bind_address: String,

    /// Optional TLS configuration. Requests accepted over TLS are "secure".
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: Option<String>,

    /// Path to private key file (PEM).
    pub key_path: Option<String>,
}

impl TlsConfig {
    /// Certificate and key paths, when both are set.
    pub fn paths(&self) -> Option<(&str, &str)> {
        Some((self.cert_path.as_deref()?, self.key_path.as_deref()?))
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address as `host:port`.
    pub address: String,

    /// Skip certificate verification on the outbound https call made for a
    /// request that arrived over TLS.
    pub skip_cert_verification: bool,

    /// Maximum wait for the upstream response head, in milliseconds.
    /// `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".to_string(),
            skip_cert_verification: true,
            timeout_ms: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit per-request diagnostics (forwarded URLs, preflights, bytes written).
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error) used when not verbose.
    pub log_level: String,

    /// Prometheus exporter bind address. Metrics are off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
