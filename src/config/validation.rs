//! Configuration validation.
//!
//! # Responsibilities
//! - Check that listen and upstream addresses are `host:port` shaped
//! - Default an empty upstream host to the loopback address
//! - Require TLS certificate and key to be configured together
//!
//! Validation runs once, before the listener binds. The listen address keeps
//! an empty host since that means "all interfaces".

use crate::config::schema::ProxyConfig;

/// Host substituted when the upstream address has none.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// A semantic problem with an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is not right, you must use a colon to separate host and port")]
    MissingPortSeparator(String),

    #[error("TLS needs both a certificate and a private key")]
    IncompleteTls,
}

/// Validate `config` and return it with the upstream address normalized.
pub fn validate_config(mut config: ProxyConfig) -> Result<ProxyConfig, ValidationError> {
    for address in [&config.upstream.address, &config.listener.bind_address] {
        if !address.contains(':') {
            return Err(ValidationError::MissingPortSeparator(address.clone()));
        }
    }

    if let Some(normalized) = default_upstream_host(&config.upstream.address) {
        tracing::info!(
            upstream = %normalized,
            "No upstream host given, using loopback"
        );
        config.upstream.address = normalized;
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_some() != tls.key_path.is_some() {
            return Err(ValidationError::IncompleteTls);
        }
    }

    Ok(config)
}

/// Returns the rewritten address when `address` has an empty host.
///
/// The port is the text between the first and second colon.
fn default_upstream_host(address: &str) -> Option<String> {
    let mut parts = address.split(':');
    let host = parts.next()?;
    if !host.is_empty() {
        return None;
    }
    let port = parts.next().unwrap_or_default();
    Some(format!("{LOOPBACK_HOST}:{port}"))
}
