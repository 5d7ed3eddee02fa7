//! Contacts and demo-request handlers: list, detail, status workflow.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use yikang_core::admin::{AdminTable, InboxScreen, PaletteEntry};
use yikang_core::{Contact, DemoRequest, Record, StatusKind};

use crate::app::App;
use crate::cli::{GlobalOpts, InboxArgs, InboxCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Per-table presentation ──────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct InboxRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Regarding")]
    regarding: String,
    #[tabled(rename = "Received")]
    received: String,
}

/// How an inbox table is shown on the terminal.
pub(crate) trait InboxView: AdminTable {
    fn row(&self, color: bool) -> InboxRow;
    fn detail_lines(&self) -> Vec<String>;
}

fn dash(v: Option<&str>) -> &str {
    v.filter(|s| !s.is_empty()).unwrap_or("-")
}

impl InboxView for Contact {
    fn row(&self, color: bool) -> InboxRow {
        InboxRow {
            id: self.id,
            status: util::status_label(self.status, color),
            name: self.name.clone(),
            hospital: self.hospital_name.clone().unwrap_or_default(),
            phone: self.phone.clone(),
            regarding: output::clip(
                &self.interest_products.as_deref().unwrap_or_default().join(", "),
                30,
            ),
            received: output::when(self.created_at),
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        let interests = self
            .interest_products
            .as_deref()
            .filter(|p| !p.is_empty())
            .map_or_else(|| "-".into(), |p| p.join(", "));
        vec![
            format!("Name:       {}", self.name),
            format!("Hospital:   {}", dash(self.hospital_name.as_deref())),
            format!("Position:   {}", dash(self.position.as_deref())),
            format!("Phone:      {}", self.phone),
            format!("Email:      {}", dash(self.email.as_deref())),
            format!("Interests:  {interests}"),
            format!("Message:    {}", dash(self.message.as_deref())),
        ]
    }
}

impl InboxView for DemoRequest {
    fn row(&self, color: bool) -> InboxRow {
        InboxRow {
            id: self.id,
            status: util::status_label(self.status, color),
            name: self.contact_name.clone(),
            hospital: self.hospital_name.clone().unwrap_or_default(),
            phone: self.phone.clone(),
            regarding: self.preferred_product.clone().unwrap_or_default(),
            received: output::when(self.created_at),
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Contact:    {}", self.contact_name),
            format!("Hospital:   {}", dash(self.hospital_name.as_deref())),
            format!("Phone:      {}", self.phone),
            format!("Email:      {}", dash(self.email.as_deref())),
            format!("Product:    {}", dash(self.preferred_product.as_deref())),
            format!("Time:       {}", dash(self.preferred_time.as_deref())),
            format!("Message:    {}", dash(self.message.as_deref())),
        ]
    }
}

// ── Detail view ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct Detail<'a, R: Record> {
    #[serde(flatten)]
    record: &'a R,
    palette: Vec<PaletteEntry<R::Status>>,
}

fn render_detail<R: InboxView>(d: &Detail<'_, R>, color: bool) -> String {
    let status = d.record.status();
    let mut lines = vec![
        format!("ID:         {}", d.record.id()),
        format!("Status:     {}", util::status_label(status, color)),
        format!("Received:   {}", output::when(d.record.created_at())),
    ];
    lines.extend(d.record.detail_lines());

    let moves: Vec<_> = d
        .palette
        .iter()
        .filter(|entry| entry.enabled)
        .map(|entry| format!("{} ({})", entry.status.as_str(), entry.label))
        .collect();
    lines.push(String::new());
    lines.push(format!("Move to:    {}", moves.join("  ")));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<R: InboxView>(
    app: &App,
    args: InboxArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    app.require_admin().await?;
    let mut screen = InboxScreen::<R>::new(Arc::clone(app.backend().client()));
    let loaded = screen.load().await;
    loaded.map_err(|e| util::screen_error(e, screen.banners().error()))?;

    match args.command {
        InboxCommand::List(list) => {
            let filter = util::parse_filter(&list.status)?;
            let view = screen.list_mut();
            view.set_search(list.search.unwrap_or_default());
            view.set_filter(filter);
            let rows: Vec<R> = view.visible().into_iter().cloned().collect();
            let out = output::render_list(
                &global.output,
                &rows,
                |r| r.row(app.color()),
                |r| r.id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InboxCommand::Get { id } => {
            let record = screen.select(id)?;
            let detail = Detail {
                record,
                palette: InboxScreen::<R>::palette(record.status()),
            };
            let out = output::render_single(
                &global.output,
                &detail,
                |d| render_detail(d, app.color()),
                |d| d.record.id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InboxCommand::SetStatus { id, status } => {
            screen.select(id)?;
            let status = util::parse_status::<R::Status>(&status)?;

            let spinner = util::spinner("更新状态...", global.quiet);
            let result = screen.set_status(id, status).await;
            spinner.finish_and_clear();

            result.map_err(|e| util::screen_error(e, screen.banners().error()))?;
            if let Some(message) = screen.banners().success() {
                output::success(message, app.color(), global.quiet);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use yikang_core::ContactStatus;

    use super::*;

    fn contact() -> Contact {
        Contact {
            id: 3,
            name: "李主任".into(),
            hospital_name: Some("省人民医院".into()),
            position: None,
            phone: "13700000000".into(),
            email: Some(String::new()),
            message: None,
            interest_products: Some(vec!["智能化病人随访系统".into()]),
            created_at: None,
            status: ContactStatus::Contacted,
        }
    }

    #[test]
    fn detail_offers_every_other_status() {
        let c = contact();
        let detail = Detail {
            record: &c,
            palette: InboxScreen::<Contact>::palette(c.status),
        };
        let text = render_detail(&detail, false);
        assert!(text.contains("Status:     已联系"));
        assert!(text.contains("Email:      -"));
        assert!(text.contains("Move to:    new (新咨询)  closed (已关闭)"));
    }

    #[test]
    fn detail_json_flattens_the_record() {
        let c = contact();
        let detail = Detail {
            record: &c,
            palette: InboxScreen::<Contact>::palette(c.status),
        };
        let value = serde_json::to_value(&detail).unwrap_or_default();
        assert_eq!(value["id"], 3);
        assert_eq!(value["status"], "contacted");
        assert_eq!(value["palette"][1]["enabled"], false);
    }
}
