//! Sign-in handlers.

use secrecy::SecretString;
use serde::Serialize;

use yikang_core::{AuthState, AuthUser};

use crate::app::App;
use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::Profile;
use crate::error::CliError;
use crate::output;

/// What `auth status` reports.
#[derive(Debug, Serialize)]
struct StatusView {
    profile: String,
    signed_in: bool,
    admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<AuthUser>,
}

fn status_detail(v: &StatusView) -> String {
    let Some(ref user) = v.user else {
        return format!("Not signed in (profile '{}')", v.profile);
    };
    [
        format!("Profile:     {}", v.profile),
        format!("Email:       {}", user.email.as_deref().unwrap_or("-")),
        format!("User ID:     {}", user.id),
        format!("Admin:       {}", if v.admin { "yes" } else { "no" }),
        format!(
            "Last login:  {}",
            user.last_sign_in_at.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

fn user_detail(user: &AuthUser) -> String {
    format!("Signed in as {}", user.email_or_empty())
}

/// Email and password for an interactive login.
///
/// With no `--email`, stored credentials are tried first. Anything
/// missing is prompted for.
fn login_credentials(
    app: &App,
    email: Option<String>,
) -> Result<(String, SecretString), CliError> {
    let fallback = Profile::default();
    let profile = app.profile().unwrap_or(&fallback);

    if email.is_none() {
        if let Ok(stored) = yikang_config::resolve_sign_in(profile, app.profile_name()) {
            return Ok(stored);
        }
    }

    let email = match email.or_else(|| profile.email.clone()) {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "email and password cannot be empty".into(),
        });
    }
    Ok((email, SecretString::from(password)))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let gate = app.backend().gate();

    match args.command {
        AuthCommand::Login { email } => {
            let (email, password) = login_credentials(app, email)?;
            let session = gate.sign_in(&email, &password).await?;
            let out = output::render_single(&global.output, &session.user, user_detail, |u| {
                u.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            gate.sign_out().await?;
            output::success("Signed out", app.color(), global.quiet);
            Ok(())
        }

        AuthCommand::Status => {
            let state = gate.snapshot();
            let view = StatusView {
                profile: app.profile_name().to_owned(),
                signed_in: matches!(state, AuthState::Authenticated { .. }),
                admin: state.is_admin(),
                user: state.user().cloned(),
            };
            let out = output::render_single(&global.output, &view, status_detail, |v| {
                v.signed_in.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Refresh => {
            let session = gate.refresh().await?;
            let expires = session
                .expires_at
                .and_then(|at| chrono::DateTime::from_timestamp(at, 0));
            output::success(
                &format!("Session refreshed, expires {}", output::when(expires)),
                app.color(),
                global.quiet,
            );
            Ok(())
        }
    }
}
