//! Command-line flags.
//!
//! Flags override values from the optional TOML file, which override the
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{ObservabilityConfig, ProxyConfig, TlsConfig};
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "cors-proxy")]
#[command(about = "Reverse proxy that answers CORS preflights and adds CORS headers", long_about = None)]
pub struct Args {
    /// Upstream service as host:port [default: 127.0.0.1:8000]
    #[arg(short = 'p', long = "upstream", value_name = "HOST:PORT")]
    pub upstream: Option<String>,

    /// Listen interface as host:port [default: 0.0.0.0:3000]
    #[arg(short = 'l', long = "listen", value_name = "HOST:PORT")]
    pub listen: Option<String>,

    /// Verbose diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// PEM certificate; serves HTTPS together with --tls-key
    #[arg(long, value_name = "FILE")]
    pub tls_cert: Option<String>,

    /// PEM private key
    #[arg(long, value_name = "FILE")]
    pub tls_key: Option<String>,

    /// Verify upstream certificates even for requests that arrived over TLS
    #[arg(long)]
    pub verify_upstream_certs: bool,

    /// Give up waiting for the upstream response after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub upstream_timeout_ms: Option<u64>,

    /// Expose Prometheus metrics on this address
    #[arg(long, value_name = "HOST:PORT")]
    pub metrics_address: Option<String>,

    /// Log level when not verbose
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Build the validated configuration: file (if any), then flags.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        Ok(validate_config(self.layered()?)?)
    }

    /// Like [`Args::into_config`], but calls `init_logging` with the
    /// observability settings before validation, so its notices are recorded.
    ///
    /// When the file cannot be loaded, `init_logging` still runs with the
    /// settings given on the command line.
    pub fn into_config_with<F>(self, init_logging: F) -> Result<ProxyConfig, ConfigError>
    where
        F: FnOnce(&ObservabilityConfig),
    {
        let mut fallback = ObservabilityConfig {
            verbose: self.verbose,
            ..ObservabilityConfig::default()
        };
        if let Some(level) = &self.log_level {
            fallback.log_level = level.clone();
        }

        match self.layered() {
            Ok(config) => {
                init_logging(&config.observability);
                Ok(validate_config(config)?)
            }
            Err(e) => {
                init_logging(&fallback);
                Err(e)
            }
        }
    }

    /// Defaults, then the file (if any), then flags. Not validated.
    fn layered(self) -> Result<ProxyConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(self, mut config: ProxyConfig) -> ProxyConfig {
        if let Some(upstream) = self.upstream {
            config.upstream.address = upstream;
        }
        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if self.verbose {
            config.observability.verbose = true;
        }
        if self.tls_cert.is_some() || self.tls_key.is_some() {
            let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
            if self.tls_cert.is_some() {
                tls.cert_path = self.tls_cert;
            }
            if self.tls_key.is_some() {
                tls.key_path = self.tls_key;
            }
        }
        if self.verify_upstream_certs {
            config.upstream.skip_cert_verification = false;
        }
        if self.upstream_timeout_ms.is_some() {
            config.upstream.timeout_ms = self.upstream_timeout_ms;
        }
        if self.metrics_address.is_some() {
            config.observability.metrics_address = self.metrics_address;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config
    }
}
