//! Request-scoped proxy errors.

use std::time::Duration;

use axum::http::uri::InvalidUri;

/// Why a forwarded request produced no upstream response.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid upstream url {url}")]
    InvalidTarget {
        url: String,
        #[source]
        source: InvalidUri,
    },

    #[error("upstream request failed")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ProxyError {
    /// The error and its whole source chain, joined with `": "`.
    ///
    /// hyper-util keeps the useful part (e.g. "Connection refused") several
    /// sources deep.
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            description.push_str(": ");
            description.push_str(&err.to_string());
            source = err.source();
        }
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_source() {
        let source = "http://exa mple".parse::<axum::http::Uri>().unwrap_err();
        let err = ProxyError::InvalidTarget {
            url: "http://exa mple".into(),
            source,
        };
        let description = err.describe();
        assert!(description.starts_with("invalid upstream url http://exa mple: "));
        assert!(description.len() > "invalid upstream url http://exa mple: ".len());
    }

    #[test]
    fn timeout_mentions_duration() {
        let err = ProxyError::Timeout(Duration::from_millis(250));
        assert_eq!(err.describe(), "upstream did not respond within 250ms");
    }
}
