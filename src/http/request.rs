//! Outbound request construction.
//!
//! # Responsibilities
//! - Rebuild the target URI from the upstream authority and the raw
//!   path-and-query of the inbound request
//! - Carry method, headers and body over unchanged
//!
//! # Design Decisions
//! - The path-and-query string is reused verbatim; no dot-segment removal
//!   or percent re-encoding
//! - Headers are moved, not filtered: every name and value (including
//!   `Host`) reaches the upstream in its original order
//! - The body is streamed; nothing is buffered here

use axum::body::Body;
use axum::http::{Request, Uri};

use crate::http::error::ProxyError;

/// URI scheme for the outbound call.
pub fn scheme(secure: bool) -> &'static str {
    if secure {
        "https"
    } else {
        "http"
    }
}

/// `scheme://upstream` followed by `original`'s path and query as received.
pub fn target_url(secure: bool, upstream: &str, original: &Uri) -> String {
    let path_and_query = original.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("{}://{}{}", scheme(secure), upstream, path_and_query)
}

/// Turn the inbound request into the one sent upstream.
pub fn build_outbound(request: Request<Body>, url: &str) -> Result<Request<Body>, ProxyError> {
    let uri: Uri = url.parse().map_err(|source| ProxyError::InvalidTarget {
        url: url.to_string(),
        source,
    })?;

    let (parts, body) = request.into_parts();
    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = uri;
    *outbound.headers_mut() = parts.headers;
    Ok(outbound)
}
