//! Database setup handler: seeds a fresh backend with starter content.

use yikang_core::{DatabaseSetup, SetupStatus};

use crate::app::App;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let confirmed = util::confirm(
        "Insert sample contacts, demo requests, news and cases?",
        "setup",
        global.yes,
    )?;
    if !confirmed {
        if !global.quiet {
            eprintln!("Cancelled");
        }
        return Ok(());
    }

    let streaming = matches!(global.output, OutputFormat::Table | OutputFormat::Plain);
    let mut setup = DatabaseSetup::new();
    let status = setup
        .run_with(app.backend().client(), |line| {
            if streaming && !global.quiet {
                eprintln!("{line}");
            }
        })
        .await;

    if !streaming {
        let out = output::render_single(&global.output, &setup, |s| s.message().to_owned(), |s| {
            s.message().to_owned()
        })?;
        output::print_output(&out, global.quiet);
    }

    match status {
        SetupStatus::Success => {
            if streaming {
                output::success(setup.message(), app.color(), global.quiet);
            }
            Ok(())
        }
        _ => Err(CliError::SetupFailed {
            message: setup
                .progress()
                .last()
                .map(|line| line.trim_start_matches("❌ 错误: ").to_owned())
                .unwrap_or_else(|| setup.message().to_owned()),
        }),
    }
}
