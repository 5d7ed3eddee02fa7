// ── Core error types ──
//
// User-facing errors from yikang-core. Callers never see reqwest errors
// or JSON parse failures directly; the `From<yikang_api::Error>` impl
// folds transport-layer errors into these variants. Remote messages are
// carried verbatim so screens can show exactly what the service said.

use thiserror::Error;

use crate::validate::FormErrors;

/// PostgreSQL "undefined_table".
pub const TABLE_MISSING_CODE: &str = "42P01";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the service timed out")]
    Timeout,

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Auth session missing!")]
    SessionMissing,

    /// An operation that needs a signed-in user was attempted without one.
    #[error("{message}")]
    NotAuthenticated { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    /// Error answered by the service, message verbatim.
    #[error("{message}")]
    Remote {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{0}")]
    Validation(FormErrors),

    #[error("Another operation is still in progress")]
    Busy,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The service reported that the target table does not exist.
    pub fn is_table_missing(&self) -> bool {
        matches!(self, Self::Remote { code: Some(code), .. } if code == TABLE_MISSING_CODE)
    }

    pub fn is_session_missing(&self) -> bool {
        matches!(self, Self::SessionMissing)
    }

    /// Shorthand for a sign-in requirement with a user-facing message.
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::NotAuthenticated {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<yikang_api::Error> for CoreError {
    fn from(err: yikang_api::Error) -> Self {
        use yikang_api::Error as Api;

        if err.is_session_missing() {
            return CoreError::SessionMissing;
        }

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::SessionMissing => CoreError::SessionMissing,
            Api::InvalidAnonKey(reason) => CoreError::Config {
                message: format!("invalid anon key: {reason}"),
            },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Remote {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::Remote {
                status,
                code,
                message,
                ..
            } => CoreError::Remote {
                message,
                code,
                status: Some(status),
            },
            Api::Function {
                status, message, ..
            } => CoreError::Remote {
                message,
                code: None,
                status: Some(status),
            },
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_keeps_service_message() {
        let err: CoreError = yikang_api::Error::Remote {
            status: 404,
            code: Some("42P01".into()),
            message: "relation \"news\" does not exist".into(),
            details: None,
            hint: None,
        }
        .into();
        assert!(err.is_table_missing());
        assert_eq!(err.to_string(), "relation \"news\" does not exist");
    }

    #[test]
    fn session_missing_message_maps_to_session_missing() {
        let err: CoreError = yikang_api::Error::Authentication {
            message: "Auth session missing!".into(),
        }
        .into();
        assert!(err.is_session_missing());
    }

    #[test]
    fn other_codes_are_not_table_missing() {
        let err = CoreError::Remote {
            message: "duplicate key".into(),
            code: Some("23505".into()),
            status: Some(409),
        };
        assert!(!err.is_table_missing());
    }
}
