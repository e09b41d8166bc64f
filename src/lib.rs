//! CORS proxy library.
//!
//! A reverse proxy that answers CORS preflight requests itself and forwards
//! everything else to a single upstream, adding `Access-Control-Allow-*`
//! headers to every reply.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
