//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use yikang_config::ConfigError;
use yikang_core::{CoreError, FormErrors};

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
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(yikang::connection_failed),
        help(
            "Check the project URL and your network.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS certificate verification failed")]
    #[diagnostic(
        code(yikang::tls_error),
        help(
            "Self-hosted behind a self-signed proxy? Use --insecure (-k),\n\
             or set ca_cert on the profile."
        )
    )]
    TlsError { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(yikang::timeout),
        help("Increase the limit with --timeout or try again later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(yikang::auth_failed),
        help(
            "Check the admin email and password.\n\
             Store the password with: yikang config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(yikang::not_signed_in),
        help(
            "{message}\n\
             Sign in with: yikang auth login"
        )
    )]
    NotSignedIn { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(yikang::no_credentials),
        help(
            "Configure the profile with: yikang config init\n\
             Or pass --url and --anon-key (YIKANG_URL, YIKANG_ANON_KEY)."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(yikang::not_found),
        help("Run: yikang {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(yikang::remote))]
    Remote {
        message: String,
        code: Option<String>,
    },

    #[error("Another operation is still in progress")]
    #[diagnostic(code(yikang::busy))]
    Busy,

    #[error("Database setup failed: {message}")]
    #[diagnostic(
        code(yikang::setup_failed),
        help("Check that the tables exist and the anon key may insert into them.")
    )]
    SetupFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(yikang::validation))]
    Validation { field: String, reason: String },

    #[error("{summary}")]
    #[diagnostic(code(yikang::form))]
    Form {
        summary: String,
        #[help]
        details: Option<String>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(yikang::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: yikang config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(yikang::no_config),
        help(
            "Create one with: yikang config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{0}")]
    #[diagnostic(code(yikang::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(yikang::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(yikang::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(yikang::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Form { .. } | Self::NonInteractiveRequiresYes { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn from_form(errors: &FormErrors) -> Self {
        let summary = errors
            .errors()
            .first()
            .map_or_else(|| "invalid input".to_owned(), |e| e.message.to_owned());
        let details = (errors.errors().len() > 1).then(|| {
            errors
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("\n")
        });
        Self::Form { summary, details }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                if reason.starts_with("TLS error") {
                    CliError::TlsError { reason }
                } else {
                    CliError::ConnectionFailed { url, reason }
                }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SessionMissing => CliError::NotSignedIn {
                message: "The stored session is missing or has expired.".into(),
            },

            CoreError::NotAuthenticated { message } => CliError::NotSignedIn { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Remote {
                message,
                code,
                status: Some(401 | 403),
            } if code.is_none() => CliError::NotSignedIn { message },

            CoreError::Remote { message, code, .. } => CliError::Remote { message, code },

            CoreError::Validation(errors) => CliError::from_form(&errors),

            CoreError::Busy => CliError::Busy,

            CoreError::Config { message } => CliError::Config(message),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

fn list_command_for(entity_type: &str) -> String {
    match entity_type {
        "News" => "news list",
        "Product case" => "cases list",
        "Contact" => "contacts list",
        "Demo request" => "demos list",
        _ => "--help",
    }
    .into()
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_lead_with_first_message() {
        let mut errors = FormErrors::new();
        errors.require("title", "", "请输入案例标题");
        errors.require("hospital_name", " ", "请输入医院名称");
        let err = CliError::from(CoreError::Validation(errors));
        assert_eq!(err.to_string(), "请输入案例标题");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn remote_messages_pass_through() {
        let err = CliError::from(CoreError::Remote {
            message: "duplicate key value".into(),
            code: Some("23505".into()),
            status: Some(409),
        });
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::from(CoreError::not_authenticated("需要登录才能执行发布操作")).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::NotFound {
                entity_type: "News".into(),
                identifier: "9".into(),
            })
            .exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: String::new(),
                reason: "TLS error: bad cert".into(),
            })
            .exit_code(),
            exit_code::CONNECTION
        );
    }
}
