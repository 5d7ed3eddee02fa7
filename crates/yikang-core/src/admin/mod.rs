// ── Admin screens ──
//
// Two shapes share one list model:
//   content screens (news, product cases): create / edit / delete
//   inbox screens (contacts, demo requests): status workflow
// Every screen fetches the whole table newest-first, then filters
// client-side by search text and status.

mod content;
mod inbox;
mod list;

use std::sync::Arc;

use yikang_api::{Order, Query, ServiceClient};

use crate::error::CoreError;
use crate::model::{Contact, DemoRequest, News, ProductCase, Record};

pub use content::{
    CaseForm, ContentForm, ContentMessages, ContentScreen, Dialog, NewsForm, SaveOutcome,
    published_at_for, DIALOG_CLOSE_DELAY,
};
pub use inbox::{InboxScreen, PaletteEntry};
pub use list::{ListView, StatusFilter, matches_search};

pub type NewsScreen = ContentScreen<NewsForm>;
pub type CasesScreen = ContentScreen<CaseForm>;
pub type ContactsScreen = InboxScreen<Contact>;
pub type DemosScreen = InboxScreen<DemoRequest>;

/// A table managed from the admin.
pub trait AdminTable: Record {
    /// Prefix of the message shown when the list fails to load.
    const LOAD_FAILED: &'static str;
}

impl AdminTable for News {
    const LOAD_FAILED: &'static str = "加载公司动态失败";
}

impl AdminTable for ProductCase {
    const LOAD_FAILED: &'static str = "加载成功案例失败";
}

impl AdminTable for Contact {
    const LOAD_FAILED: &'static str = "加载客户咨询失败";
}

impl AdminTable for DemoRequest {
    const LOAD_FAILED: &'static str = "加载演示预约失败";
}

/// Explicit answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes { Self::Confirmed } else { Self::Declined }
    }
}

/// Whole table, newest first. No pagination.
pub async fn fetch_all<R: Record>(client: &ServiceClient) -> Result<Vec<R>, CoreError> {
    let query = Query::new().order("created_at", Order::Descending);
    Ok(client.select(R::TABLE, &query).await?)
}

/// Shared plumbing for one screen: client, list, and busy flags.
struct ScreenCore<R: Record> {
    client: Arc<ServiceClient>,
    list: ListView<R>,
    loading: bool,
    writing: bool,
}

impl<R: AdminTable> ScreenCore<R> {
    fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            list: ListView::default(),
            loading: false,
            writing: false,
        }
    }

    /// Reload the list; returns the user-facing failure message on error.
    async fn reload(&mut self) -> Result<(), (CoreError, String)> {
        self.loading = true;
        let result = fetch_all::<R>(&self.client).await;
        self.loading = false;
        match result {
            Ok(rows) => {
                self.list.set_rows(rows);
                Ok(())
            }
            Err(e) => {
                tracing::error!(table = R::TABLE, error = %e, "list load failed");
                let message = format!("{}: {e}", R::LOAD_FAILED);
                Err((e, message))
            }
        }
    }

    /// Claim the single write slot.
    fn begin_write(&mut self) -> Result<(), CoreError> {
        if self.writing {
            return Err(CoreError::Busy);
        }
        self.writing = true;
        Ok(())
    }

    fn end_write(&mut self) {
        self.writing = false;
    }
}
