//! News handlers.

use std::sync::Arc;

use tabled::Tabled;

use yikang_core::News;
use yikang_core::admin::{NewsForm, NewsScreen};

use crate::app::App;
use crate::cli::{GlobalOpts, NewsArgs, NewsCommand, NewsFields};
use crate::error::CliError;
use crate::output;

use super::{content, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NewsRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn row(n: &News, color: bool) -> NewsRow {
    NewsRow {
        id: n.id,
        status: util::status_label(n.status, color),
        title: output::clip(&n.title, 32),
        author: n.author.clone().unwrap_or_default(),
        published: output::when(n.published_at),
        created: output::when(n.created_at),
    }
}

fn detail(n: &News) -> String {
    let mut lines = vec![
        format!("ID:         {}", n.id),
        format!("Title:      {}", n.title),
        format!("Status:     {}", util::status_label(n.status, false)),
        format!("Author:     {}", n.author.as_deref().unwrap_or("-")),
        format!("Published:  {}", output::when(n.published_at)),
        format!("Created:    {}", output::when(n.created_at)),
        format!("Updated:    {}", output::when(n.updated_at)),
    ];
    if let Some(ref url) = n.image_url {
        lines.push(format!("Image:      {url}"));
    }
    if let Some(ref summary) = n.summary {
        lines.push(format!("\n{summary}"));
    }
    if let Some(ref body) = n.content {
        lines.push(format!("\n{body}"));
    }
    lines.join("\n")
}

/// Copy the flags that were given onto the form.
fn apply(form: &mut NewsForm, fields: NewsFields) -> Result<(), CliError> {
    if let Some(status) = fields.status {
        form.status = util::parse_status(&status)?;
    }
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(content) = fields.content {
        form.content = content;
    }
    if let Some(summary) = fields.summary {
        form.summary = summary;
    }
    if let Some(image_url) = fields.image_url {
        form.image_url = image_url;
    }
    if let Some(author) = fields.author {
        form.author = author;
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: NewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let user = app.require_admin().await?;
    let mut screen = NewsScreen::new(Arc::clone(app.backend().client()));

    match args.command {
        NewsCommand::List(list) => {
            content::load(&mut screen).await?;
            let rows = content::visible(&mut screen, &list)?;
            let out = output::render_list(
                &global.output,
                &rows,
                |n| row(n, app.color()),
                |n| n.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NewsCommand::Get { id } => {
            content::load(&mut screen).await?;
            let news = content::find(&screen, id)?;
            let out = output::render_single(&global.output, &news, detail, |n| n.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NewsCommand::Create(fields) => {
            apply(screen.open_new(Some(&user)), fields)?;
            content::save(&mut screen, app, global).await
        }

        NewsCommand::Update { id, fields } => {
            content::load(&mut screen).await?;
            apply(screen.open_edit(id, Some(&user))?, fields)?;
            content::save(&mut screen, app, global).await
        }

        NewsCommand::Delete { id } => content::delete(&mut screen, id, app, global).await,
    }
}
