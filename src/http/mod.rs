//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → OPTIONS: cors.rs (preflight headers) → response.rs → client
//!     → other:   request.rs (outbound request) → upstream
//!                → response.rs (CORS headers + streamed body) → client
//! ```

pub mod cors;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use server::{build_router, AppState, HttpServer, ServerError};
