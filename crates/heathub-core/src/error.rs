// ── Core error types ──
//
// Errors surfaced by `heathub-core` entry points that return a value
// (construction, explicit refreshes, station queries). Command
// operations never return these; their failures show up only as
// connectivity state.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach hub: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Hub didn't respond in time (timeout {timeout_secs}s)")]
    Timeout { timeout_secs: u64 },

    #[error("Hub returned HTTP {status}")]
    Status { status: u16 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Could not parse hub response: {message}")]
    Parse { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Hub has been stopped; refresh result discarded")]
    Stopped,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<heathub_api::Error> for CoreError {
    fn from(err: heathub_api::Error) -> Self {
        match err {
            heathub_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            heathub_api::Error::Status { status } => Self::Status { status },
            heathub_api::Error::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            heathub_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else {
                    Self::ConnectionFailed {
                        reason: e.to_string(),
                    }
                }
            }
            heathub_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid hub address: {e}"),
            },
            heathub_api::Error::ClientBuild(message) => Self::Config { message },
            heathub_api::Error::Deserialization { message, body: _ } => Self::Parse { message },
        }
    }
}
