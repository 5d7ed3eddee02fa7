//! Command dispatch: bridges CLI args to core screens and output formatting.

pub mod auth;
pub mod cases;
pub mod config_cmd;
mod content;
pub mod dashboard;
pub mod deploy;
pub mod inbox;
pub mod news;
pub mod open;
pub mod setup;
pub mod site;
pub mod upload;
pub mod util;

use yikang_core::{Contact, DemoRequest};

use crate::app::App;
use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Open(args) => open::handle(app, args, global).await,
        Command::Site(args) => site::handle(app, args, global).await,
        Command::Auth(args) => auth::handle(app, args, global).await,
        Command::Dashboard => dashboard::handle(app, global).await,
        Command::News(args) => news::handle(app, args, global).await,
        Command::Cases(args) => cases::handle(app, args, global).await,
        Command::Contacts(args) => inbox::handle::<Contact>(app, args, global).await,
        Command::Demos(args) => inbox::handle::<DemoRequest>(app, args, global).await,
        Command::Deploy(args) => deploy::handle(app, args, global).await,
        Command::Upload(args) => upload::handle(app, args, global).await,
        Command::Setup => setup::handle(app, global).await,
        // Handled before a backend is built.
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions run without a backend".into(),
        )),
    }
}
