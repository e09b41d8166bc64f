//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the wait for an upstream response head when configured
//! - Leave the call unbounded otherwise
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Only the response head is bounded; the body streams for as long as
//!   both ends keep the connection open

use std::future::Future;
use std::time::Duration;

use crate::http::error::ProxyError;

/// Await `call`, failing with [`ProxyError::Timeout`] after `limit`.
pub async fn with_deadline<T, F>(limit: Option<Duration>, call: F) -> Result<T, ProxyError>
where
    F: Future<Output = Result<T, ProxyError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ProxyError::Timeout(limit))?,
        None => call.await,
    }
}
