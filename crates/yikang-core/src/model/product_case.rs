// ── Product case (customer success story) ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CaseStatus, Record, RecordId, timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCase {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result_summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for ProductCase {
    const TABLE: &'static str = "product_cases";
    const KIND: &'static str = "Product case";
    type Status = CaseStatus;

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.hospital_name.as_deref());
        fields.extend(self.product_name.as_deref());
        fields
    }
}
