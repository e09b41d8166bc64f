//! TCP listener binding.
//!
//! A listen address with an empty host (`:3000`) means all interfaces. The
//! configured string is kept as given; only the bind call fills in the
//! wildcard host.

use std::borrow::Cow;

use tokio::net::TcpListener;

/// Host used for a listen address with no host part.
pub const ALL_INTERFACES: &str = "0.0.0.0";

/// The address handed to the socket layer for `address`.
pub fn bind_target(address: &str) -> Cow<'_, str> {
    if address.starts_with(':') {
        Cow::Owned(format!("{ALL_INTERFACES}{address}"))
    } else {
        Cow::Borrowed(address)
    }
}

/// Bind the proxy listener.
pub async fn bind(address: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(bind_target(address).as_ref()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        configured = %address,
        "Listener bound"
    );
    Ok(listener)
}
