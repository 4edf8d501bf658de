use thiserror::Error;

/// Top-level error type for the `heathub-api` crate.
///
/// Every failure mode of a single request against the hub: authorization,
/// transport, non-success status, and body decoding. `heathub-core` turns
/// these into a connectivity verdict rather than surfacing them raw.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The hub rejected the shared secret (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The hub answered with anything other than HTTP 200.
    #[error("Hub returned HTTP {status}")]
    Status { status: u16 },

    /// The request exceeded its deadline.
    #[error("Hub didn't respond in time (timeout {timeout_secs}s)")]
    Timeout { timeout_secs: u64 },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the hub refused our shared secret.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The HTTP status the hub answered with, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Status { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the response arrived but its body could not be decoded.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn authentication_reports_401() {
        let err = Error::Authentication {
            message: "Invalid authorization token".into(),
        };
        assert!(err.is_auth_failure());
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout_has_no_status() {
        let err = Error::Timeout { timeout_secs: 10 };
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn deserialization_is_parse_failure() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert!(err.is_parse_failure());
        assert_eq!(err.status(), None);
    }
}
