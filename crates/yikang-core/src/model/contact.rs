// ── Contact (public inquiry) ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContactStatus, Record, RecordId, timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub interest_products: Option<Vec<String>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ContactStatus,
}

impl Record for Contact {
    const TABLE: &'static str = "contacts";
    const KIND: &'static str = "Contact";
    type Status = ContactStatus;

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> ContactStatus {
        self.status
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.phone.as_str()];
        fields.extend(self.hospital_name.as_deref());
        fields.extend(self.email.as_deref());
        fields
    }
}
