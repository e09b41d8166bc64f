//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (optional bound on the response head)
//!     → On failure: 500 to the client, no retry
//! ```

pub mod timeouts;
