//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Map the verbose flag onto the log filter
//!
//! # Design Decisions
//! - Per-request diagnostics are `debug!` events; verbose mode is simply a
//!   debug-level filter for this crate
//! - `RUST_LOG` wins over both the verbose flag and the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool, log_level: &str) -> String {
    if verbose {
        "cors_proxy=debug,tower_http=debug".to_string()
    } else {
        format!("cors_proxy={log_level},tower_http={log_level}")
    }
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool, log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(verbose, log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
