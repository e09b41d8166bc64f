//! An upstream with no CORS support, for trying the proxy by hand.
//!
//! ```text
//! cargo run --example mock_upstream
//! cargo run -- -p 127.0.0.1:8000 -v
//! curl -i -X OPTIONS -H 'Access-Control-Request-Method: PUT' http://127.0.0.1:3000/items
//! curl -i -X POST -d '{"a":1}' http://127.0.0.1:3000/items?x=1
//! ```

use axum::{body::Body, http::Request, routing::get, Router};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/status", get(|| async { "Upstream is healthy" }))
        .fallback(|request: Request<Body>| async move {
            format!("{} {}\n", request.method(), request.uri())
        });

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock upstream listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
