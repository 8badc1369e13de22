// ── Core error types ──
//
// User-facing errors from carewatch-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<carewatch_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session disconnected")]
    SessionDisconnected,

    #[error("Backend connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Card not found: {identifier}")]
    CardNotFound { identifier: String },

    #[error("Alarm event not found: {identifier}")]
    AlarmEventNotFound { identifier: String },

    // ── Policy errors ────────────────────────────────────────────────
    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    // ── Playback errors ──────────────────────────────────────────────
    // Absorbed by the monitor loop; surfaces only when a sounder is
    // driven directly.
    #[error("Alert playback failed: {message}")]
    Playback { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<carewatch_api::Error> for CoreError {
    fn from(err: carewatch_api::Error) -> Self {
        match err {
            carewatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            carewatch_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            carewatch_api::Error::MissingToken => CoreError::SessionDisconnected,
            carewatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(std::string::ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            carewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            carewatch_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            carewatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            carewatch_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            carewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
