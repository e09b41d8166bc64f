//! Inbound TLS: certificate loading for the listener.
//!
//! Connections accepted through this config are the "secure" ones: their
//! requests are forwarded over https.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("{what} file not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("failed to load certificate or key: {0}")]
    Load(#[from] std::io::Error),
}

/// Load the listener's certificate chain and private key (PEM).
pub async fn load_tls_config(cert_path: &str, key_path: &str) -> Result<RustlsConfig, TlsError> {
    let cert_path = existing("Certificate", cert_path)?;
    let key_path = existing("Private key", key_path)?;

    let config = RustlsConfig::from_pem_file(&cert_path, &key_path).await?;
    tracing::info!(cert = %cert_path.display(), "TLS certificate loaded");
    Ok(config)
}

fn existing(what: &'static str, path: &str) -> Result<PathBuf, TlsError> {
    let path = Path::new(path);
    if path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(TlsError::NotFound {
            what,
            path: path.to_path_buf(),
        })
    }
}
