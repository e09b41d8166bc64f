//! Response handling and transformation.
//!
//! # Responsibilities
//! - Build preflight replies
//! - Relay the upstream status, headers and body to the client
//! - Map forwarding errors to a plain-text 500
//!
//! # Design Decisions
//! - CORS base headers always come first; upstream headers are appended
//! - Streaming responses avoid buffering the entire body
//! - Headers are complete before the response leaves the handler, so a
//!   mid-body failure can only truncate the body

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, BodyDataStream, Bytes};
use axum::http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use futures_util::Stream;
use hyper::body::Incoming;

use crate::http::cors;
use crate::http::error::ProxyError;

/// Empty 200 carrying the preflight headers for `request_headers`.
pub fn preflight_response(request_headers: &HeaderMap) -> Response {
    let mut response = Response::new(Body::empty());
    *response.headers_mut() = cors::preflight_headers(request_headers);
    response
}

/// 500 whose body is the error description.
pub fn error_response(err: &ProxyError) -> Response {
    let mut headers = cors::base_headers();
    headers.append(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    let mut response = Response::new(Body::from(err.describe()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    *response.headers_mut() = headers;
    response
}

/// Pass the upstream response through with CORS headers prepended.
pub fn relay(upstream: axum::http::Response<Incoming>, url: String) -> Response {
    let (parts, body) = upstream.into_parts();
    let stream = RelayStream::new(Body::new(body).into_data_stream(), url);

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = parts.status;
    *response.headers_mut() = cors::with_base_headers(&parts.headers);
    response
}

/// Upstream body as a stream, counting bytes and logging how it ended.
pub struct RelayStream {
    inner: BodyDataStream,
    url: String,
    written: u64,
    finished: bool,
}

impl RelayStream {
    pub fn new(inner: BodyDataStream, url: String) -> Self {
        Self {
            inner,
            url,
            written: 0,
            finished: false,
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.written += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::error!(
                    url = %this.url,
                    bytes = this.written,
                    error = %e,
                    "Upstream body interrupted"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    tracing::debug!(url = %this.url, bytes = this.written, "Written");
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                url = %self.url,
                bytes = self.written,
                "Client went away before the body completed"
            );
        }
    }
}
