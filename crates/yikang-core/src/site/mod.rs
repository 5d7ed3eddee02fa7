// ── Public site data access ──
//
// Thin wrapper over the table endpoint for everything the public site
// reads or writes: inquiry and demo submissions, published news, and
// active product cases. No retry, caching, or offline queue; errors
// carry the service's own message.

mod forms;
mod sections;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use yikang_api::{Order, Query, ServiceClient};

use crate::error::CoreError;
use crate::model::{
    CaseStatus, Contact, ContactStatus, DemoRequest, DemoStatus, News, NewsStatus, ProductCase,
    Record, RecordId, StatusKind,
};

pub use forms::{ContactForm, DemoRequestForm, INTEREST_PRODUCTS};
pub use sections::{CasesSection, ContactSection, ContactTab, NewsSection, SectionState};

pub const CONTACT_RECEIPT_MESSAGE: &str = "感谢您的联系，我们将在24小时内与您取得联系！";
pub const DEMO_RECEIPT_MESSAGE: &str =
    "演示预约申请已提交成功！我们的产品专家将在1个工作日内联系您安排演示时间。";

/// Cap used when a caller doesn't pick one for product cases.
pub const DEFAULT_CASES_LIMIT: u32 = 10;
/// Cap used by the public cases and news sections.
pub const SECTION_LIMIT: u32 = 3;

/// Canned success envelope returned by public submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub message: String,
    /// Id of the stored row, when the service echoed it back.
    pub id: Option<RecordId>,
    pub status: &'static str,
}

impl SubmissionReceipt {
    fn success(message: &str, id: Option<RecordId>) -> Self {
        Self {
            message: message.to_owned(),
            id,
            status: "success",
        }
    }
}

#[derive(Serialize)]
struct Stamped<'a, F: Serialize, S: StatusKind> {
    #[serde(flatten)]
    form: &'a F,
    status: S,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Inserted {
    #[serde(default)]
    id: Option<RecordId>,
}

/// Public data-access wrapper.
#[derive(Clone)]
pub struct SiteData {
    client: Arc<ServiceClient>,
}

impl SiteData {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self { client }
    }

    async fn submit<F: Serialize + Sync, S: StatusKind>(
        &self,
        table: &str,
        form: &F,
        status: S,
    ) -> Result<Option<RecordId>, CoreError> {
        let row = Stamped {
            form,
            status,
            created_at: Utc::now(),
        };
        let inserted: Vec<Inserted> = self
            .client
            .insert(table, &[row])
            .await
            .inspect_err(|e| warn!(table, error = %e, "submission failed"))?;
        let id = inserted.first().and_then(|row| row.id);
        debug!(table, ?id, "submission stored");
        Ok(id)
    }

    /// Store a public inquiry as `new`.
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<SubmissionReceipt, CoreError> {
        form.validate().map_err(CoreError::Validation)?;
        let id = self
            .submit(Contact::TABLE, form, ContactStatus::New)
            .await?;
        Ok(SubmissionReceipt::success(CONTACT_RECEIPT_MESSAGE, id))
    }

    /// Store a demo request as `pending`.
    pub async fn submit_demo_request(
        &self,
        form: &DemoRequestForm,
    ) -> Result<SubmissionReceipt, CoreError> {
        form.validate().map_err(CoreError::Validation)?;
        let id = self
            .submit(DemoRequest::TABLE, form, DemoStatus::Pending)
            .await?;
        Ok(SubmissionReceipt::success(DEMO_RECEIPT_MESSAGE, id))
    }

    /// Published news, newest first. `None` returns every published item.
    pub async fn get_news(&self, limit: Option<u32>) -> Result<Vec<News>, CoreError> {
        let query = Query::new()
            .eq("status", NewsStatus::Published)
            .order("published_at", Order::Descending)
            .limit_opt(limit);
        Ok(self.client.select(News::TABLE, &query).await?)
    }

    /// Active product cases, newest first, capped at `limit` (default 10).
    pub async fn get_product_cases(&self, limit: Option<u32>) -> Result<Vec<ProductCase>, CoreError> {
        let query = Query::new()
            .eq("status", CaseStatus::Active)
            .order("created_at", Order::Descending)
            .limit(limit.unwrap_or(DEFAULT_CASES_LIMIT));
        Ok(self.client.select(ProductCase::TABLE, &query).await?)
    }
}
