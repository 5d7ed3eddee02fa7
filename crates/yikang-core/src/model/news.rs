// ── News (company updates) ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NewsStatus, Record, RecordId, timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: NewsStatus,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for News {
    const TABLE: &'static str = "news";
    const KIND: &'static str = "News";
    type Status = NewsStatus;

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> NewsStatus {
        self.status
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.summary.as_deref());
        fields
    }
}
