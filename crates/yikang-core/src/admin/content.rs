// Content screens: news and product cases.
//
// A dialog holds the form being edited (pre-filled when editing an
// existing row). Saving validates locally first; nothing is sent when
// the form is invalid. A successful save reloads the list, shows the
// success message, and schedules the dialog to close after 1.5 s. A
// failed save keeps the dialog open with the service's message.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{info, warn};
use yikang_api::{AuthUser, Query, ServiceClient};

use super::{AdminTable, Confirmation, ListView, ScreenCore};
use crate::banner::Banners;
use crate::error::CoreError;
use crate::model::{CaseStatus, News, NewsStatus, ProductCase, RecordId};
use crate::validate::FormErrors;

pub const DIALOG_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// User-facing messages for one content screen.
#[derive(Debug, Clone, Copy)]
pub struct ContentMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub delete_prompt: &'static str,
}

/// An editable form for a content table.
pub trait ContentForm: Serialize + Clone + Send + Sync {
    type Record: AdminTable;

    const MESSAGES: ContentMessages;

    /// Empty form for a new row.
    fn blank(user: Option<&AuthUser>) -> Self;

    /// Form pre-filled from an existing row.
    fn from_record(record: &Self::Record, user: Option<&AuthUser>) -> Self;

    fn validate(&self) -> Result<(), FormErrors>;

    /// Extra columns derived from the form and the row being edited.
    fn derived(&self, _editing: Option<&Self::Record>, _now: DateTime<Utc>) -> Map<String, Value> {
        Map::new()
    }
}

// ── News ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub image_url: String,
    pub status: NewsStatus,
    pub author: String,
}

/// `published_at` to write for a news save.
///
/// Published forms keep the row's existing timestamp when it was already
/// published and get `now` otherwise; any other status clears it.
pub fn published_at_for(
    status: NewsStatus,
    editing: Option<&News>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if status != NewsStatus::Published {
        return None;
    }
    match editing {
        Some(existing) if existing.status == NewsStatus::Published => existing.published_at,
        _ => Some(now),
    }
}

fn user_email(user: Option<&AuthUser>) -> String {
    user.and_then(|u| u.email.clone()).unwrap_or_default()
}

impl ContentForm for NewsForm {
    type Record = News;

    const MESSAGES: ContentMessages = ContentMessages {
        created: "公司动态创建成功！",
        updated: "公司动态更新成功！",
        deleted: "公司动态删除成功！",
        delete_prompt: "确定要删除这篇动态吗？",
    };

    fn blank(user: Option<&AuthUser>) -> Self {
        Self {
            author: user_email(user),
            ..Self::default()
        }
    }

    fn from_record(news: &News, user: Option<&AuthUser>) -> Self {
        Self {
            title: news.title.clone(),
            content: news.content.clone().unwrap_or_default(),
            summary: news.summary.clone().unwrap_or_default(),
            image_url: news.image_url.clone().unwrap_or_default(),
            status: news.status,
            author: news
                .author
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| user_email(user)),
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("title", &self.title, "请输入文章标题");
        errors.require("content", &self.content, "请输入文章内容");
        errors.into_result()
    }

    fn derived(&self, editing: Option<&News>, now: DateTime<Utc>) -> Map<String, Value> {
        let published_at = published_at_for(self.status, editing, now);
        let mut extra = Map::new();
        extra.insert(
            "published_at".into(),
            published_at.map_or(Value::Null, |t| Value::String(t.to_rfc3339())),
        );
        extra
    }
}

// ── Product cases ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseForm {
    pub title: String,
    pub hospital_name: String,
    pub product_name: String,
    pub description: String,
    pub result_summary: String,
    pub image_url: String,
    pub status: CaseStatus,
}

impl ContentForm for CaseForm {
    type Record = ProductCase;

    const MESSAGES: ContentMessages = ContentMessages {
        created: "成功案例创建成功！",
        updated: "成功案例更新成功！",
        deleted: "成功案例删除成功！",
        delete_prompt: "确定要删除这个成功案例吗？",
    };

    fn blank(_user: Option<&AuthUser>) -> Self {
        Self::default()
    }

    fn from_record(case: &ProductCase, _user: Option<&AuthUser>) -> Self {
        Self {
            title: case.title.clone(),
            hospital_name: case.hospital_name.clone().unwrap_or_default(),
            product_name: case.product_name.clone().unwrap_or_default(),
            description: case.description.clone().unwrap_or_default(),
            result_summary: case.result_summary.clone().unwrap_or_default(),
            image_url: case.image_url.clone().unwrap_or_default(),
            status: case.status,
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("title", &self.title, "请输入案例标题");
        errors.require("hospital_name", &self.hospital_name, "请输入医院名称");
        errors.into_result()
    }
}

// ── Screen ───────────────────────────────────────────────────────────

/// The open create/edit dialog.
pub struct Dialog<F: ContentForm> {
    pub form: F,
    editing: Option<F::Record>,
    closes_at: Option<Instant>,
}

impl<F: ContentForm> Dialog<F> {
    pub fn editing(&self) -> Option<&F::Record> {
        self.editing.as_ref()
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    fn is_open(&self) -> bool {
        self.closes_at.is_none_or(|at| Instant::now() < at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct ContentScreen<F: ContentForm> {
    core: ScreenCore<F::Record>,
    dialog: Option<Dialog<F>>,
    banners: Banners,
}

impl<F: ContentForm> ContentScreen<F> {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            core: ScreenCore::new(client),
            dialog: None,
            banners: Banners::default(),
        }
    }

    // ── List ─────────────────────────────────────────────────────────

    pub async fn load(&mut self) -> Result<(), CoreError> {
        self.core.reload().await.map_err(|(e, message)| {
            self.banners.show_error(message, None);
            e
        })
    }

    pub fn list(&self) -> &ListView<F::Record> {
        &self.core.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<F::Record> {
        &mut self.core.list
    }

    pub fn is_loading(&self) -> bool {
        self.core.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.core.writing
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    // ── Dialog ───────────────────────────────────────────────────────

    pub fn open_new(&mut self, user: Option<&AuthUser>) -> &mut F {
        self.banners.clear();
        let dialog = self.dialog.insert(Dialog {
            form: F::blank(user),
            editing: None,
            closes_at: None,
        });
        &mut dialog.form
    }

    pub fn open_edit(&mut self, id: RecordId, user: Option<&AuthUser>) -> Result<&mut F, CoreError> {
        let record = self
            .core
            .list
            .find(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: <F::Record as crate::model::Record>::KIND.into(),
                identifier: id.to_string(),
            })?;
        self.banners.clear();
        let dialog = self.dialog.insert(Dialog {
            form: F::from_record(&record, user),
            editing: Some(record),
            closes_at: None,
        });
        Ok(&mut dialog.form)
    }

    /// The open dialog; `None` once closed or past its auto-close deadline.
    pub fn dialog(&self) -> Option<&Dialog<F>> {
        self.dialog.as_ref().filter(|d| d.is_open())
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.dialog
            .as_mut()
            .filter(|d| d.is_open())
            .map(|d| &mut d.form)
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.banners.clear();
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate and write the open form.
    pub async fn save(&mut self) -> Result<SaveOutcome, CoreError> {
        let Some(dialog) = self.dialog.as_ref().filter(|d| d.is_open()) else {
            return Err(CoreError::Internal("no form is open".into()));
        };

        if let Err(errors) = dialog.form.validate() {
            if let Some(first) = errors.errors().first() {
                self.banners.show_error(first.message, None);
            }
            return Err(CoreError::Validation(errors));
        }

        let now = Utc::now();
        let mut row = match serde_json::to_value(&dialog.form) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(CoreError::Internal("form did not serialize to an object".into())),
            Err(e) => return Err(CoreError::Internal(e.to_string())),
        };
        row.extend(dialog.form.derived(dialog.editing.as_ref(), now));
        row.insert("updated_at".into(), Value::String(now.to_rfc3339()));
        let editing_id = dialog
            .editing
            .as_ref()
            .map(crate::model::Record::id);

        self.core.begin_write()?;
        self.banners.clear();
        let table = <F::Record as crate::model::Record>::TABLE;

        let result = match editing_id {
            Some(id) => self
                .core
                .client
                .update::<Value, _>(table, &Query::new().eq("id", id), &row)
                .await
                .map(|_| SaveOutcome::Updated),
            None => {
                row.insert("created_at".into(), Value::String(now.to_rfc3339()));
                self.core
                    .client
                    .insert::<Value, _>(table, &[Value::Object(row)])
                    .await
                    .map(|_| SaveOutcome::Created)
            }
        };
        self.core.end_write();

        match result {
            Ok(outcome) => {
                info!(table, ?outcome, id = ?editing_id, "content saved");
                let message = match outcome {
                    SaveOutcome::Created => F::MESSAGES.created,
                    SaveOutcome::Updated => F::MESSAGES.updated,
                };
                if let Err((_, load_message)) = self.core.reload().await {
                    self.banners.show_error(load_message, None);
                } else {
                    self.banners.show_success(message, None);
                }
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.closes_at = Some(Instant::now() + DIALOG_CLOSE_DELAY);
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(table, error = %e, "content save failed");
                let e = CoreError::from(e);
                self.banners.show_error(format!("保存失败: {e}"), None);
                Err(e)
            }
        }
    }

    /// Delete a row after explicit confirmation. Returns whether anything
    /// was deleted.
    pub async fn delete(
        &mut self,
        id: RecordId,
        confirmation: Confirmation,
    ) -> Result<bool, CoreError> {
        if confirmation == Confirmation::Declined {
            return Ok(false);
        }

        self.core.begin_write()?;
        let table = <F::Record as crate::model::Record>::TABLE;
        let result = self
            .core
            .client
            .delete(table, &Query::new().eq("id", id))
            .await;
        self.core.end_write();

        match result {
            Ok(()) => {
                info!(table, id, "content deleted");
                if let Err((_, load_message)) = self.core.reload().await {
                    self.banners.show_error(load_message, None);
                } else {
                    self.banners.show_success(F::MESSAGES.deleted, None);
                }
                Ok(true)
            }
            Err(e) => {
                warn!(table, id, error = %e, "content delete failed");
                let e = CoreError::from(e);
                self.banners.show_error(format!("删除失败: {e}"), None);
                Err(e)
            }
        }
    }
}
