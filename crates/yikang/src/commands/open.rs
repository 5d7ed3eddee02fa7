//! `open`: resolve a site location to a mode and show that mode.

use serde::Serialize;

use yikang_core::site::{CasesSection, NewsSection};
use yikang_core::{AdminRoute, AppMode, Contact, DemoRequest, News, ProductCase};

use crate::app::App;
use crate::cli::{
    CasesArgs, CasesCommand, DeployArgs, DeployCommand, GlobalOpts, InboxArgs, InboxCommand,
    ListArgs, NewsArgs, NewsCommand, OpenArgs, OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::{cases, dashboard, deploy, inbox, news, setup, site};

fn describe(mode: &AppMode) -> String {
    match mode {
        AppMode::Setup => "setup".into(),
        AppMode::Admin(route) => format!("admin {} ({})", route.path(), route.title()),
        AppMode::PublicSite => "public site".into(),
    }
}

/// Print the resolved mode only; works without any configuration.
pub fn resolve_only(args: &OpenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mode = AppMode::from_location(&args.location);
    let out = output::render_single(&global.output, &mode, describe, describe)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn all_rows() -> ListArgs {
    ListArgs {
        search: None,
        status: "all".into(),
    }
}

#[derive(Serialize)]
struct PublicView<'a> {
    cases: &'a [ProductCase],
    news: &'a [News],
}

async fn public_site(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let site_data = app.backend().site();
    let mut cases_section = CasesSection::new();
    let mut news_section = NewsSection::new();
    tokio::join!(cases_section.load(&site_data), news_section.load(&site_data));

    if matches!(global.output, OutputFormat::Table) {
        output::print_output("成功案例", global.quiet);
        site::print_cases(cases_section.state(), global)?;
        output::print_output("\n公司动态", global.quiet);
        return site::print_news(news_section.state(), global);
    }

    let view = PublicView {
        cases: cases_section.state().items(),
        news: news_section.state().items(),
    };
    let out = output::render_single(&global.output, &view, |_| String::new(), |v| {
        v.cases
            .iter()
            .map(|c| c.id.to_string())
            .chain(v.news.iter().map(|n| n.id.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn admin(app: &App, route: AdminRoute, global: &GlobalOpts) -> Result<(), CliError> {
    tracing::info!(screen = %route, "opening admin screen");
    let inbox_list = || InboxArgs {
        command: InboxCommand::List(all_rows()),
    };
    match route {
        AdminRoute::Dashboard => dashboard::handle(app, global).await,
        AdminRoute::News => {
            let args = NewsArgs {
                command: NewsCommand::List(all_rows()),
            };
            news::handle(app, args, global).await
        }
        AdminRoute::Cases => {
            let args = CasesArgs {
                command: CasesCommand::List(all_rows()),
            };
            cases::handle(app, args, global).await
        }
        AdminRoute::Contacts => inbox::handle::<Contact>(app, inbox_list(), global).await,
        AdminRoute::Demos => inbox::handle::<DemoRequest>(app, inbox_list(), global).await,
        AdminRoute::Deploy => {
            let args = DeployArgs {
                command: DeployCommand::Logs,
            };
            deploy::handle(app, args, global).await
        }
    }
}

pub async fn handle(app: &App, args: OpenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mode = AppMode::from_location(&args.location);
    tracing::debug!(location = %args.location, mode = %describe(&mode), "resolved location");

    match mode {
        AppMode::Setup => setup::handle(app, global).await,
        AppMode::Admin(route) => admin(app, route, global).await,
        AppMode::PublicSite => public_site(app, global).await,
    }
}
