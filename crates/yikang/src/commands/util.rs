//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use yikang_core::admin::StatusFilter;
use yikang_core::{CoreError, StatusKind};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `--status` filter value (`all` or a wire value).
pub fn parse_filter<S: StatusKind>(raw: &str) -> Result<StatusFilter<S>, CliError> {
    StatusFilter::parse(raw).ok_or_else(|| CliError::Validation {
        field: "status".into(),
        reason: format!("expected 'all' or one of: {}", wire_values::<S>()),
    })
}

/// Parse a status wire value for a write.
pub fn parse_status<S: StatusKind>(raw: &str) -> Result<S, CliError> {
    S::from_wire(raw).ok_or_else(|| CliError::Validation {
        field: "status".into(),
        reason: format!("expected one of: {}", wire_values::<S>()),
    })
}

fn wire_values<S: StatusKind>() -> String {
    S::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prefer the screen's error banner over the bare remote message.
pub fn screen_error(err: CoreError, banner: Option<&str>) -> CliError {
    match (err, banner) {
        (CoreError::Remote { code, .. }, Some(banner)) => CliError::Remote {
            message: banner.to_owned(),
            code,
        },
        (err, _) => err.into(),
    }
}

/// Spinner on stderr while a remote call runs; hidden when quiet or
/// not attached to a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Localized status label, tinted when color is on.
pub fn status_label<S: StatusKind>(status: S, color: bool) -> String {
    crate::output::paint_status(status.as_str(), status.label(), color)
}

/// Empty string for blank or missing values, matching form semantics.
pub fn or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}
