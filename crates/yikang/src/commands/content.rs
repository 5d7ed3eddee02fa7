//! Plumbing shared by the news and product-case handlers.

use yikang_core::admin::{Confirmation, ContentForm, ContentScreen};
use yikang_core::{CoreError, Record, RecordId};

use crate::app::App;
use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub(crate) async fn load<F: ContentForm>(screen: &mut ContentScreen<F>) -> Result<(), CliError> {
    let result = screen.load().await;
    result.map_err(|e| util::screen_error(e, screen.banners().error()))
}

/// Rows passing `--search` and `--status`, in fetch order.
pub(crate) fn visible<F: ContentForm>(
    screen: &mut ContentScreen<F>,
    args: &ListArgs,
) -> Result<Vec<F::Record>, CliError> {
    let filter = util::parse_filter(&args.status)?;
    let list = screen.list_mut();
    list.set_search(args.search.clone().unwrap_or_default());
    list.set_filter(filter);
    Ok(list.visible().into_iter().cloned().collect())
}

pub(crate) fn find<F: ContentForm>(
    screen: &ContentScreen<F>,
    id: RecordId,
) -> Result<F::Record, CliError> {
    screen.list().find(id).cloned().ok_or_else(|| {
        CoreError::NotFound {
            entity_type: <F::Record as Record>::KIND.into(),
            identifier: id.to_string(),
        }
        .into()
    })
}

/// Save the open form and report the screen's outcome message.
pub(crate) async fn save<F: ContentForm>(
    screen: &mut ContentScreen<F>,
    app: &App,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = util::spinner("保存中...", global.quiet);
    let result = screen.save().await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "saved");
            if let Some(message) = screen.banners().success() {
                output::success(message, app.color(), global.quiet);
            } else if let Some(message) = screen.banners().error() {
                tracing::warn!("{message}");
            }
            Ok(())
        }
        Err(CoreError::Validation(errors)) => Err(CliError::from_form(&errors)),
        Err(e) => Err(util::screen_error(e, screen.banners().error())),
    }
}

/// Delete after confirmation. Declining is not an error.
pub(crate) async fn delete<F: ContentForm>(
    screen: &mut ContentScreen<F>,
    id: RecordId,
    app: &App,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    load(screen).await?;
    find(screen, id)?;

    let confirmed = util::confirm(F::MESSAGES.delete_prompt, "delete", global.yes)?;
    let result = screen.delete(id, Confirmation::from(confirmed)).await;
    match result {
        Ok(true) => {
            if let Some(message) = screen.banners().success() {
                output::success(message, app.color(), global.quiet);
            }
            Ok(())
        }
        Ok(false) => {
            if !global.quiet {
                eprintln!("Cancelled");
            }
            Ok(())
        }
        Err(e) => Err(util::screen_error(e, screen.banners().error())),
    }
}
