//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use heathub_config::ConfigError;
use heathub_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the hub: {reason}")]
    #[diagnostic(
        code(heathub::connection_failed),
        help(
            "Check that the hub is powered and on the same network.\n\
             Try: heathub status --address <hub-ip>"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Heathub didn't respond in time")]
    #[diagnostic(
        code(heathub::timeout),
        help("Increase the request timeout with --timeout, or check the hub's Wi-Fi signal.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Invalid authorization token")]
    #[diagnostic(
        code(heathub::auth_failed),
        help(
            "The hub rejected the shared secret.\n\
             Update `secret` or `secret_env` in your profile, or set HEATHUB_SECRET."
        )
    )]
    AuthFailed,

    #[error("No shared secret configured for profile '{profile}'")]
    #[diagnostic(
        code(heathub::no_secret),
        help("Set `secret_env` or `secret` in the profile, or pass --secret / HEATHUB_SECRET.")
    )]
    NoSecret { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(heathub::not_found),
        help("Run: heathub {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Commands ─────────────────────────────────────────────────────
    #[error("The hub did not accept the command ({outcome})")]
    #[diagnostic(code(heathub::command_failed))]
    CommandFailed { outcome: String },

    #[error("Hub API error: {message}")]
    #[diagnostic(code(heathub::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(heathub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(heathub::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No hub configured")]
    #[diagnostic(
        code(heathub::no_config),
        help(
            "Add a profile to {path}, or pass --address and --secret.\n\
             Example:\n  [profiles.default]\n  address = \"192.168.1.20\"\n  secret_env = \"HEATHUB_SECRET\""
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(heathub::config))]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(code(heathub::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed | Self::NoSecret { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::Config(_) => exit_code::USAGE,
            Self::CommandFailed { .. } | Self::Api { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversion from core errors ──────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { .. } => Self::AuthFailed,
            CoreError::Timeout { .. } => Self::Timeout,
            CoreError::Config { message } => Self::Validation {
                field: "address".into(),
                reason: message,
            },
            CoreError::Status { .. } | CoreError::Parse { .. } | CoreError::Stopped => Self::Api {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "Invalid authorization token".into(),
        }
        .into();
        let timeout: CliError = CoreError::Timeout { timeout_secs: 10 }.into();
        let status: CliError = CoreError::Status { status: 500 }.into();

        assert_eq!(auth.exit_code(), exit_code::AUTH);
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
        assert_eq!(status.exit_code(), exit_code::GENERAL);
        assert_eq!(status.to_string(), "Hub API error: Hub returned HTTP 500");
    }
}
