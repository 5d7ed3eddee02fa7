use thiserror::Error;

/// Top-level error type for the `yikang-api` crate.
///
/// Covers every failure mode across the three service surfaces:
/// auth, REST tables, and edge functions.
/// `yikang-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in or token refresh rejected (bad credentials, revoked token, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The service has no session for the presented token.
    #[error("Auth session missing!")]
    SessionMissing,

    /// The anon key could not be turned into a header value.
    #[error("Invalid anon key: {0}")]
    InvalidAnonKey(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── REST tables ─────────────────────────────────────────────────
    /// Structured error from the table endpoint (`{code, message, details, hint}`).
    #[error("{message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    // ── Functions ───────────────────────────────────────────────────
    /// An edge function answered with a non-success status.
    #[error("{message}")]
    Function {
        name: String,
        status: u16,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and signing in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionMissing)
            || matches!(self, Self::Remote { status: 401, .. })
    }

    /// Returns `true` when the service reports that no session exists.
    ///
    /// This is the normal signed-out state, not a failure.
    pub fn is_session_missing(&self) -> bool {
        match self {
            Self::SessionMissing => true,
            Self::Authentication { message } => {
                message.contains("Auth session missing") || message.contains("AuthSessionMissingError")
            }
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Remote { status: 404, .. } | Self::Function { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the service error code (e.g. `42P01`), if available.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status attached to the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::Function { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
