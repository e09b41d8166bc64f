//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (args.rs)
//!     → optional TOML file (loader.rs)
//!     → flags applied over file values
//!     → validation.rs (address checks, upstream host default)
//!     → ProxyConfig (validated, immutable)
//!     → moved into the HTTP server state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Any error here is fatal at startup

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Args;
pub use loader::ConfigError;
pub use schema::{ListenerConfig, ObservabilityConfig, ProxyConfig, TlsConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
