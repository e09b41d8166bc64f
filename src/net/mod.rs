//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming connection
//!     → listener.rs (bind; empty host means all interfaces)
//!     → tls.rs (optional TLS handshake; marks requests secure)
//!     → Hand off to HTTP layer
//!
//! Outgoing request
//!     → upstream.rs (verifying or non-verifying client)
//!     → upstream service
//! ```

pub mod listener;
pub mod tls;
pub mod upstream;

pub use upstream::{UpstreamClient, UpstreamClients};
