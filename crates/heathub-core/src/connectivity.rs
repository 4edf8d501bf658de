// ── Connectivity classification ──
//
// Every transport call ends in a `TransportOutcome`; `classify` turns that
// into the bridge's connectivity verdict. The hub publishes the verdict
// (plus a detail line for the offline cases) on a watch channel.

use serde::Serialize;
use strum::Display;

/// Detail text attached to an authorization failure.
pub const INVALID_TOKEN_DETAIL: &str = "Invalid authorization token";

/// Detail text attached to a request that exceeded its deadline.
pub const TIMEOUT_DETAIL: &str = "Heathub didn't respond in time";

/// Bridge connectivity as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    #[strum(serialize = "online")]
    Online,
    /// Network failure, timeout, or an unexpected HTTP status.
    #[strum(serialize = "offline (communication error)")]
    OfflineCommunicationError,
    /// The hub rejected the shared secret.
    #[strum(serialize = "offline (configuration error)")]
    OfflineConfigurationError,
}

impl ConnectivityState {
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// How a single transport call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The hub answered with this HTTP status.
    Status(u16),
    /// No answer within the request deadline.
    Timeout,
    /// Connection refused, DNS failure, TLS failure, and the like.
    NetworkFailure,
}

impl TransportOutcome {
    /// Outcome of a finished request.
    ///
    /// A body that fails to parse still arrived with HTTP 200, so it counts
    /// as a 200 here; parse failures are handled by the refresh cycle.
    pub fn of<T>(result: &Result<T, heathub_api::Error>) -> Self {
        let Err(err) = result else {
            return Self::Status(200);
        };

        match err {
            heathub_api::Error::Authentication { .. } => Self::Status(401),
            heathub_api::Error::Status { status } => Self::Status(*status),
            heathub_api::Error::Timeout { .. } => Self::Timeout,
            heathub_api::Error::Deserialization { .. } => Self::Status(200),
            heathub_api::Error::Transport(e) if e.is_timeout() => Self::Timeout,
            heathub_api::Error::Transport(e) => e
                .status()
                .map_or(Self::NetworkFailure, |s| Self::Status(s.as_u16())),
            heathub_api::Error::InvalidUrl(_) | heathub_api::Error::ClientBuild(_) => {
                Self::NetworkFailure
            }
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Status(200)
    }
}

impl std::fmt::Display for TransportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Timeout => f.write_str("timed out"),
            Self::NetworkFailure => f.write_str("network failure"),
        }
    }
}

/// Map a transport outcome onto a connectivity state.
pub fn classify(outcome: TransportOutcome) -> ConnectivityState {
    match outcome {
        TransportOutcome::Status(200) => ConnectivityState::Online,
        TransportOutcome::Status(401) => ConnectivityState::OfflineConfigurationError,
        TransportOutcome::Status(_) | TransportOutcome::Timeout | TransportOutcome::NetworkFailure => {
            ConnectivityState::OfflineCommunicationError
        }
    }
}

/// Connectivity verdict plus the operator-facing detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeStatus {
    pub state: ConnectivityState,
    pub detail: Option<String>,
}

impl BridgeStatus {
    pub fn online() -> Self {
        Self {
            state: ConnectivityState::Online,
            detail: None,
        }
    }

    /// Verdict for a finished request. Detail is only set when offline.
    pub fn from_result<T>(result: &Result<T, heathub_api::Error>) -> Self {
        let outcome = TransportOutcome::of(result);
        let state = classify(outcome);
        if state.is_online() {
            return Self::online();
        }

        let detail = match (outcome, result) {
            (TransportOutcome::Status(401), _) => INVALID_TOKEN_DETAIL.to_owned(),
            (TransportOutcome::Timeout, _) => TIMEOUT_DETAIL.to_owned(),
            (_, Err(err)) => err.to_string(),
            (_, Ok(_)) => outcome.to_string(),
        };

        Self {
            state,
            detail: Some(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_statuses() {
        assert_eq!(classify(TransportOutcome::Status(200)), ConnectivityState::Online);
        assert_eq!(
            classify(TransportOutcome::Status(401)),
            ConnectivityState::OfflineConfigurationError
        );
        assert_eq!(
            classify(TransportOutcome::Status(204)),
            ConnectivityState::OfflineCommunicationError
        );
        assert_eq!(
            classify(TransportOutcome::Status(500)),
            ConnectivityState::OfflineCommunicationError
        );
    }

    #[test]
    fn classify_maps_transport_failures() {
        assert_eq!(
            classify(TransportOutcome::Timeout),
            ConnectivityState::OfflineCommunicationError
        );
        assert_eq!(
            classify(TransportOutcome::NetworkFailure),
            ConnectivityState::OfflineCommunicationError
        );
    }

    #[test]
    fn parse_failure_counts_as_reachable() {
        let result: Result<(), _> = Err(heathub_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert_eq!(TransportOutcome::of(&result), TransportOutcome::Status(200));
        assert_eq!(BridgeStatus::from_result(&result), BridgeStatus::online());
    }

    #[test]
    fn unauthorized_carries_token_detail() {
        let result: Result<(), _> = Err(heathub_api::Error::Authentication {
            message: INVALID_TOKEN_DETAIL.into(),
        });
        let status = BridgeStatus::from_result(&result);
        assert_eq!(status.state, ConnectivityState::OfflineConfigurationError);
        assert_eq!(status.detail.as_deref(), Some(INVALID_TOKEN_DETAIL));
    }

    #[test]
    fn timeout_carries_timeout_detail() {
        let result: Result<(), _> = Err(heathub_api::Error::Timeout { timeout_secs: 10 });
        let status = BridgeStatus::from_result(&result);
        assert_eq!(status.state, ConnectivityState::OfflineCommunicationError);
        assert_eq!(status.detail.as_deref(), Some(TIMEOUT_DETAIL));
    }

    #[test]
    fn other_status_uses_error_text() {
        let result: Result<(), _> = Err(heathub_api::Error::Status { status: 503 });
        let status = BridgeStatus::from_result(&result);
        assert_eq!(status.state, ConnectivityState::OfflineCommunicationError);
        assert_eq!(status.detail, Some(heathub_api::Error::Status { status: 503 }.to_string()));
    }

    #[test]
    fn success_is_online_without_detail() {
        let result: Result<(), heathub_api::Error> = Ok(());
        assert!(TransportOutcome::of(&result).is_success());
        assert_eq!(BridgeStatus::from_result(&result), BridgeStatus::online());
    }
}
