//! Public site handlers: published content and visitor submissions.

use tabled::Tabled;

use yikang_core::site::{
    ContactForm, DemoRequestForm, INTEREST_PRODUCTS, NewsSection, SectionState, SiteData,
    SubmissionReceipt,
};
use yikang_core::{News, ProductCase};

use crate::app::App;
use crate::cli::{ContactArgs, DemoArgs, GlobalOpts, OutputFormat, SiteArgs, SiteCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const NO_NEWS: &str = "暂无公司动态";
const NO_CASES: &str = "暂无成功案例，欢迎联系我们了解更多。";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct NewsRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl From<&News> for NewsRow {
    fn from(n: &News) -> Self {
        Self {
            id: n.id,
            published: output::when(n.published_at),
            title: n.title.clone(),
            summary: output::clip(n.summary.as_deref().unwrap_or_default(), 40),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct CaseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&ProductCase> for CaseRow {
    fn from(c: &ProductCase) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            hospital: c.hospital_name.clone().unwrap_or_default(),
            product: c.product_name.clone().unwrap_or_default(),
            result: output::clip(c.result_summary.as_deref().unwrap_or_default(), 30),
        }
    }
}

fn receipt_detail(r: &SubmissionReceipt) -> String {
    match r.id {
        Some(id) => format!("{}\nID: {id}", r.message),
        None => r.message.clone(),
    }
}

fn receipt_id(r: &SubmissionReceipt) -> String {
    r.id.map(|id| id.to_string()).unwrap_or_default()
}

// ── Rendering shared with `open` ────────────────────────────────────

pub(crate) fn print_news(
    state: &SectionState<News>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if matches!(state, SectionState::Empty) && matches!(global.output, OutputFormat::Table) {
        output::print_output(NO_NEWS, global.quiet);
        return Ok(());
    }
    let out = output::render_list(&global.output, state.items(), |n| NewsRow::from(n), |n| {
        n.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub(crate) fn print_cases(
    state: &SectionState<ProductCase>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if matches!(state, SectionState::Empty) && matches!(global.output, OutputFormat::Table) {
        output::print_output(NO_CASES, global.quiet);
        return Ok(());
    }
    let out = output::render_list(&global.output, state.items(), |c| CaseRow::from(c), |c| {
        c.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Forms ───────────────────────────────────────────────────────────

fn contact_form(args: ContactArgs) -> Result<ContactForm, CliError> {
    let mut form = ContactForm {
        name: args.name,
        phone: args.phone,
        hospital_name: util::or_blank(args.hospital.as_deref()),
        position: util::or_blank(args.position.as_deref()),
        email: util::or_blank(args.email.as_deref()),
        message: util::or_blank(args.message.as_deref()),
        interest_products: Vec::new(),
    };
    for product in &args.interests {
        if !INTEREST_PRODUCTS.contains(&product.as_str()) {
            return Err(CliError::Validation {
                field: "interest".into(),
                reason: format!("unknown product, expected one of: {}", INTEREST_PRODUCTS.join(", ")),
            });
        }
        if !form.interest_products.contains(product) {
            form.toggle_interest(product);
        }
    }
    Ok(form)
}

fn demo_form(args: DemoArgs) -> DemoRequestForm {
    DemoRequestForm {
        contact_name: args.contact_name,
        phone: args.phone,
        hospital_name: util::or_blank(args.hospital.as_deref()),
        email: util::or_blank(args.email.as_deref()),
        preferred_product: util::or_blank(args.product.as_deref()),
        preferred_time: util::or_blank(args.time.as_deref()),
        message: util::or_blank(args.message.as_deref()),
    }
}

fn print_receipt(receipt: &SubmissionReceipt, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, receipt, receipt_detail, receipt_id)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: SiteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let site: SiteData = app.backend().site();

    match args.command {
        SiteCommand::News { all } => {
            let mut section = NewsSection::new();
            section.set_show_all(&site, all).await;
            print_news(section.state(), global)
        }

        SiteCommand::Cases { limit } => {
            let cases = site.get_product_cases(Some(limit)).await?;
            let state = if cases.is_empty() {
                SectionState::Empty
            } else {
                SectionState::Ready(cases)
            };
            print_cases(&state, global)
        }

        SiteCommand::Contact(args) => {
            let form = contact_form(args)?;
            let receipt = site.submit_contact(&form).await?;
            print_receipt(&receipt, global)
        }

        SiteCommand::Demo(args) => {
            let receipt = site.submit_demo_request(&demo_form(args)).await?;
            tracing::debug!(status = receipt.status, "demo request stored");
            print_receipt(&receipt, global)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn contact_args(interests: &[&str]) -> ContactArgs {
        ContactArgs {
            name: "王医生".into(),
            phone: "13800000000".into(),
            hospital: Some("市第一医院".into()),
            position: None,
            email: None,
            message: None,
            interests: interests.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn interests_keep_order_and_drop_repeats() {
        let form = contact_form(contact_args(&[
            "智能化慢病管理系统",
            "数字化远程康复系统",
            "智能化慢病管理系统",
        ]))
        .unwrap();
        assert_eq!(
            form.interest_products,
            vec!["智能化慢病管理系统", "数字化远程康复系统"]
        );
        assert_eq!(form.position, "");
        assert_eq!(form.hospital_name, "市第一医院");
    }

    #[test]
    fn unknown_interest_is_rejected() {
        let err = contact_form(contact_args(&["火星探测器"])).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn receipt_detail_includes_id_when_known() {
        let receipt = SubmissionReceipt {
            message: "ok".into(),
            id: Some(7),
            status: "success",
        };
        assert_eq!(receipt_detail(&receipt), "ok\nID: 7");
        assert_eq!(receipt_id(&receipt), "7");
    }
}
