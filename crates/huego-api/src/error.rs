use thiserror::Error;

/// Top-level error type for the `huego-api` crate.
///
/// Covers configuration mistakes caught before any network traffic,
/// transport failures, envelope decoding, and the few semantic errors the
/// typed accessors produce. Nothing is retried; every variant is handed
/// straight back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// The bridge host passed to a constructor was empty.
    #[error("host must be a URL or a host:port pair")]
    EmptyHost,

    /// URL parsing error (even after prefixing a default scheme).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The raw query string could not be parsed.
    #[error("Invalid query string {query:?}: {reason}")]
    InvalidQuery { query: String, reason: String },

    /// A header name or value was rejected by the HTTP layer.
    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The request body could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not a valid `{data, errors}` envelope, or `data` did not
    /// match the requested type. Carries the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Semantic ────────────────────────────────────────────────────
    /// A get-by-id lookup returned no entries.
    #[error("{resource_type} {id} not found")]
    NotFound { resource_type: String, id: String },

    /// The bridge reported one or more errors in the response envelope.
    #[error("Bridge reported errors: {}", descriptions.join("; "))]
    Bridge { descriptions: Vec<String> },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The library never retries on its own; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` for errors raised before any request left the process.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyHost
                | Self::InvalidUrl(_)
                | Self::InvalidQuery { .. }
                | Self::InvalidHeader { .. }
                | Self::Serialization(_)
                | Self::Tls(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_joins_descriptions() {
        let err = Error::Bridge {
            descriptions: vec!["unauthorized user".into(), "resource not found".into()],
        };
        assert_eq!(
            err.to_string(),
            "Bridge reported errors: unauthorized user; resource not found"
        );
    }

    #[test]
    fn not_found_is_classified() {
        let err = Error::NotFound {
            resource_type: "light".into(),
            id: "abc".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert!(!Error::Cancelled.is_not_found());
        assert!(
            !Error::Bridge {
                descriptions: vec!["resource not found".into()]
            }
            .is_not_found()
        );
        assert_eq!(err.to_string(), "light abc not found");
    }

    #[test]
    fn query_error_is_configuration() {
        let err = Error::InvalidQuery {
            query: "%zz".into(),
            reason: "invalid escape".into(),
        };
        assert!(err.is_configuration());
        assert!(!Error::Cancelled.is_configuration());
    }
}
