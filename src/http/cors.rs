//! CORS header synthesis.
//!
//! Every reply carries the two base headers. A preflight reply also mirrors
//! each `Access-Control-Request-*` header the client sent as the matching
//! `Access-Control-Allow-*` header.

use axum::http::{
    header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
    HeaderMap, HeaderName, HeaderValue, Method,
};

/// Methods advertised on every reply. `HEAD` appears twice; clients in the
/// wild already parse this exact value.
pub const ALLOWED_METHODS: &str = "GET, PUT, POST, HEAD, TRACE, DELETE, PATCH, COPY, HEAD, LINK, OPTIONS";

const REQUEST_MARKER: &str = "access-control-request";

/// Whether the request is answered locally.
pub fn is_preflight(method: &Method) -> bool {
    *method == Method::OPTIONS
}

/// `Access-Control-Allow-Origin: *` followed by `Access-Control-Allow-Methods`.
pub fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2);
    headers.append(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.append(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers
}

/// Base headers followed by every entry of `extra`, in order.
///
/// Nothing is replaced: a name present in both ends up with both values.
pub fn with_base_headers(extra: &HeaderMap) -> HeaderMap {
    let mut headers = base_headers();
    headers.reserve(extra.len());
    for (name, value) in extra {
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// The `Allow` counterpart of a `Request` header name, if `name` is one.
///
/// Only the first `request` in the name is replaced, so
/// `x-access-control-request-request-id` maps to
/// `x-access-control-allow-request-id`.
pub fn allow_header_name(name: &HeaderName) -> Option<HeaderName> {
    let name = name.as_str();
    if !name.contains(REQUEST_MARKER) {
        return None;
    }
    HeaderName::try_from(name.replacen("request", "allow", 1)).ok()
}

/// Reply headers for a preflight carrying `request_headers`.
pub fn preflight_headers(request_headers: &HeaderMap) -> HeaderMap {
    let mut headers = base_headers();
    for name in request_headers.keys() {
        let Some(allow) = allow_header_name(name) else {
            continue;
        };
        for value in request_headers.get_all(name) {
            headers.append(allow.clone(), value.clone());
        }
    }
    headers
}
