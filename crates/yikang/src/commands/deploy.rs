//! Deploy handlers.

use std::sync::Arc;

use tabled::Tabled;

use yikang_core::deploy::{DeployConsole, DeployOverview};
use yikang_core::DeployLog;

use crate::app::App;
use crate::cli::{DeployArgs, DeployCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeployRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "By")]
    by: String,
    #[tabled(rename = "Triggered")]
    triggered: String,
    #[tabled(rename = "Completed")]
    completed: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

fn row(log: &DeployLog, color: bool) -> DeployRow {
    DeployRow {
        id: log.id,
        status: util::status_label(log.status, color),
        by: log.triggered_by_email.clone().unwrap_or_default(),
        triggered: output::when(log.triggered_at),
        completed: output::when(log.completed_at),
        notes: output::clip(log.notes.as_deref().unwrap_or_default(), 30),
    }
}

fn stats_line(overview: &DeployOverview) -> String {
    let s = &overview.stats;
    format!(
        "总发布次数: {}  成功: {}  失败: {}  最近发布: {}",
        s.total_deploys,
        s.successful_deploys,
        s.failed_deploys,
        output::when(s.last_deploy_time)
    )
}

fn print_overview(overview: &DeployOverview, app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match global.output {
        OutputFormat::Table => {
            let table = output::render_list(
                &global.output,
                &overview.logs,
                |l| row(l, app.color()),
                |l| l.id.to_string(),
            )?;
            format!("{}\n{table}", stats_line(overview))
        }
        OutputFormat::Plain => overview
            .logs
            .iter()
            .map(|l| l.id.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_single(&global.output, overview, stats_line, stats_line)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(app: &App, args: DeployArgs, global: &GlobalOpts) -> Result<(), CliError> {
    app.require_admin().await?;
    let backend = app.backend();
    let mut console = DeployConsole::new(Arc::clone(backend.client()), Arc::clone(backend.auth()));

    match args.command {
        DeployCommand::Logs => {
            let result = console.load_logs().await;
            result.map_err(|e| util::screen_error(e, console.banners().error()))?;
            print_overview(console.overview(), app, global)
        }

        DeployCommand::Trigger => {
            let confirmed = util::confirm("确定要发布网站吗？", "deploy", global.yes)?;
            if !confirmed {
                if !global.quiet {
                    eprintln!("Cancelled");
                }
                return Ok(());
            }

            let spinner = util::spinner("发布中...", global.quiet);
            let result = console.trigger().await;
            spinner.finish_and_clear();
            result.map_err(|e| util::screen_error(e, console.banners().error()))?;

            if let Some(message) = console.banners().success() {
                output::success(message, app.color(), global.quiet);
            }
            if let Some(message) = console.banners().error() {
                tracing::warn!("{message}");
            }
            print_overview(console.overview(), app, global)
        }
    }
}
