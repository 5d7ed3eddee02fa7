// ── Deploy log (returned by the deploy functions, not a table) ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeployStatus, RecordId, timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployLog {
    pub id: RecordId,
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default)]
    pub triggered_by_email: Option<String>,
    #[serde(default)]
    pub status: DeployStatus,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub triggered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Aggregate counters reported alongside the log list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStats {
    #[serde(default)]
    pub total_deploys: u64,
    #[serde(default)]
    pub successful_deploys: u64,
    #[serde(default)]
    pub failed_deploys: u64,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub last_deploy_time: Option<DateTime<Utc>>,
}
