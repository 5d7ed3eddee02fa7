// ── Domain model ──
//
// Row types for the four site tables plus the deploy log returned by the
// deploy functions. Every table type implements [`Record`], which is what
// the generic admin list/search/status machinery works against.

pub mod contact;
pub mod deploy_log;
pub mod demo_request;
pub mod news;
pub mod product_case;
pub mod status;
pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use contact::Contact;
pub use demo_request::DemoRequest;
pub use deploy_log::{DeployLog, DeployStats};
pub use news::News;
pub use product_case::ProductCase;
pub use status::{CaseStatus, ContactStatus, DemoStatus, DeployStatus, NewsStatus, StatusKind};

/// Service-assigned integer primary key.
pub type RecordId = i64;

/// A row of one of the site tables.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table name under `/rest/v1/`.
    const TABLE: &'static str;
    /// Human-readable kind, used in not-found errors.
    const KIND: &'static str;

    type Status: StatusKind;

    fn id(&self) -> RecordId;
    fn status(&self) -> Self::Status;
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Fields matched by the admin search box.
    fn search_fields(&self) -> Vec<&str>;
}
