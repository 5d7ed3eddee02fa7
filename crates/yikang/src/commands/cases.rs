//! Product case handlers.

use std::sync::Arc;

use tabled::Tabled;

use yikang_core::ProductCase;
use yikang_core::admin::{CaseForm, CasesScreen};

use crate::app::App;
use crate::cli::{CaseFields, CasesArgs, CasesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{content, util};

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn row(c: &ProductCase, color: bool) -> CaseRow {
    CaseRow {
        id: c.id,
        status: util::status_label(c.status, color),
        title: output::clip(&c.title, 32),
        hospital: c.hospital_name.clone().unwrap_or_default(),
        product: c.product_name.clone().unwrap_or_default(),
        created: output::when(c.created_at),
    }
}

fn detail(c: &ProductCase) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    [
        format!("ID:         {}", c.id),
        format!("Title:      {}", c.title),
        format!("Status:     {}", util::status_label(c.status, false)),
        format!("Hospital:   {}", field(&c.hospital_name)),
        format!("Product:    {}", field(&c.product_name)),
        format!("Image:      {}", field(&c.image_url)),
        format!("Created:    {}", output::when(c.created_at)),
        format!("Updated:    {}", output::when(c.updated_at)),
        format!("Result:     {}", field(&c.result_summary)),
        String::new(),
        field(&c.description),
    ]
    .join("\n")
}

fn apply(form: &mut CaseForm, fields: CaseFields) -> Result<(), CliError> {
    if let Some(status) = fields.status {
        form.status = util::parse_status(&status)?;
    }
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(hospital) = fields.hospital {
        form.hospital_name = hospital;
    }
    if let Some(product) = fields.product {
        form.product_name = product;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(result_summary) = fields.result_summary {
        form.result_summary = result_summary;
    }
    if let Some(image_url) = fields.image_url {
        form.image_url = image_url;
    }
    Ok(())
}

pub async fn handle(app: &App, args: CasesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let user = app.require_admin().await?;
    let mut screen = CasesScreen::new(Arc::clone(app.backend().client()));

    match args.command {
        CasesCommand::List(list) => {
            content::load(&mut screen).await?;
            let rows = content::visible(&mut screen, &list)?;
            let out = output::render_list(
                &global.output,
                &rows,
                |c| row(c, app.color()),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CasesCommand::Get { id } => {
            content::load(&mut screen).await?;
            let case = content::find(&screen, id)?;
            let out = output::render_single(&global.output, &case, detail, |c| c.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CasesCommand::Create(fields) => {
            apply(screen.open_new(Some(&user)), fields)?;
            content::save(&mut screen, app, global).await
        }

        CasesCommand::Update { id, fields } => {
            content::load(&mut screen).await?;
            apply(screen.open_edit(id, Some(&user))?, fields)?;
            content::save(&mut screen, app, global).await
        }

        CasesCommand::Delete { id } => content::delete(&mut screen, id, app, global).await,
    }
}
