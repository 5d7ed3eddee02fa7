//! Dashboard handler: counters and the recent-activity feed.

use std::fmt::Write;

use yikang_core::dashboard::{self, ActivityKind, Dashboard};

use crate::app::App;
use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn summary(d: &Dashboard) -> String {
    let s = &d.stats;
    let mut out = String::new();
    let _ = writeln!(out, "客户咨询   {:>5}   本月新增 {}", s.total_contacts, s.new_contacts_this_month);
    let _ = writeln!(out, "演示预约   {:>5}   待处理 {}", s.total_demo_requests, s.pending_demos);
    let _ = writeln!(out, "公司动态   {:>5}   草稿 {}", s.total_news, s.draft_news);
    let _ = writeln!(out, "成功案例   {:>5}", s.total_cases);

    if d.recent.is_empty() {
        return out;
    }
    let _ = writeln!(out, "\n最近活动");
    for a in &d.recent {
        let tag = match a.kind {
            ActivityKind::Contact => "咨询",
            ActivityKind::Demo => "演示",
        };
        let _ = writeln!(out, "  {}  [{tag}] {}  {}", output::when(a.at), a.title, a.status);
    }
    out
}

pub async fn handle(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    app.require_admin().await?;

    let spinner = util::spinner("加载中...", global.quiet);
    let dashboard = dashboard::load(app.backend().client(), chrono::Utc::now()).await;
    spinner.finish_and_clear();

    let out = output::render_single(
        &global.output,
        &dashboard,
        summary,
        |d| d.stats.total_contacts.to_string(),
    )?;
    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}
