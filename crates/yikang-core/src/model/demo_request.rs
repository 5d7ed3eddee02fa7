// ── Demo request ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DemoStatus, Record, RecordId, timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoRequest {
    pub id: RecordId,
    pub contact_name: String,
    #[serde(default)]
    pub hospital_name: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_product: Option<String>,
    /// Free-form, as typed by the visitor.
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: DemoStatus,
}

impl Record for DemoRequest {
    const TABLE: &'static str = "demo_requests";
    const KIND: &'static str = "Demo request";
    type Status = DemoStatus;

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> DemoStatus {
        self.status
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.contact_name.as_str(), self.phone.as_str()];
        fields.extend(self.hospital_name.as_deref());
        fields.extend(self.email.as_deref());
        fields.extend(self.preferred_product.as_deref());
        fields
    }
}
