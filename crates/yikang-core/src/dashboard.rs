// ── Admin dashboard ──
//
// Row counts per table plus a short feed of the newest inquiries and
// demo requests. Each figure loads independently; a failed one is
// logged and reads as zero.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use yikang_api::{Order, Query, ServiceClient};

use crate::model::{
    Contact, DemoRequest, DemoStatus, News, NewsStatus, ProductCase, Record, RecordId, StatusKind,
};

const RECENT_CONTACTS: u32 = 3;
const RECENT_DEMOS: u32 = 2;
const RECENT_CAP: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_contacts: u64,
    pub total_demo_requests: u64,
    pub total_news: u64,
    pub total_cases: u64,
    pub new_contacts_this_month: u64,
    pub pending_demos: u64,
    pub draft_news: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Contact,
    Demo,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: RecordId,
    pub kind: ActivityKind,
    pub title: String,
    pub at: Option<DateTime<Utc>>,
    pub status: &'static str,
}

impl From<&Contact> for Activity {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id,
            kind: ActivityKind::Contact,
            title: format!("新用户咨询: {}", c.name),
            at: c.created_at,
            status: c.status.label(),
        }
    }
}

impl From<&DemoRequest> for Activity {
    fn from(d: &DemoRequest) -> Self {
        Self {
            id: d.id,
            kind: ActivityKind::Demo,
            title: format!("演示预约: {}", d.contact_name),
            at: d.created_at,
            status: d.status.label(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent: Vec<Activity>,
}

/// `YYYY-MM-01` for the month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-01").to_string()
}

/// Merge the two feeds newest-first, capped at eight entries.
pub fn merge_activity(contacts: &[Contact], demos: &[DemoRequest]) -> Vec<Activity> {
    let mut feed: Vec<Activity> = contacts
        .iter()
        .map(Activity::from)
        .chain(demos.iter().map(Activity::from))
        .collect();
    // Undated entries sort last.
    feed.sort_by(|a, b| b.at.cmp(&a.at));
    feed.truncate(RECENT_CAP);
    feed
}

async fn count_or_zero(client: &ServiceClient, table: &str, query: Query) -> u64 {
    match client.count(table, &query).await {
        Ok(n) => n,
        Err(e) => {
            warn!(table, error = %e, "dashboard count failed");
            0
        }
    }
}

async fn newest_or_empty<R: Record>(client: &ServiceClient, limit: u32) -> Vec<R> {
    let query = Query::new()
        .order("created_at", Order::Descending)
        .limit(limit);
    match client.select(R::TABLE, &query).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(table = R::TABLE, error = %e, "dashboard feed failed");
            Vec::new()
        }
    }
}

/// Load every figure concurrently.
pub async fn load(client: &ServiceClient, now: DateTime<Utc>) -> Dashboard {
    let (
        total_contacts,
        total_demo_requests,
        total_news,
        total_cases,
        new_contacts_this_month,
        pending_demos,
        draft_news,
    ) = tokio::join!(
        count_or_zero(client, Contact::TABLE, Query::new()),
        count_or_zero(client, DemoRequest::TABLE, Query::new()),
        count_or_zero(client, News::TABLE, Query::new()),
        count_or_zero(client, ProductCase::TABLE, Query::new()),
        count_or_zero(
            client,
            Contact::TABLE,
            Query::new().gte("created_at", month_start(now)),
        ),
        count_or_zero(
            client,
            DemoRequest::TABLE,
            Query::new().eq("status", DemoStatus::Pending),
        ),
        count_or_zero(
            client,
            News::TABLE,
            Query::new().eq("status", NewsStatus::Draft),
        ),
    );

    let (contacts, demos) = tokio::join!(
        newest_or_empty::<Contact>(client, RECENT_CONTACTS),
        newest_or_empty::<DemoRequest>(client, RECENT_DEMOS),
    );

    Dashboard {
        stats: DashboardStats {
            total_contacts,
            total_demo_requests,
            total_news,
            total_cases,
            new_contacts_this_month,
            pending_demos,
            draft_news,
        },
        recent: merge_activity(&contacts, &demos),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ContactStatus, model_fixtures};

    #[test]
    fn month_start_formats_first_day() {
        let now = DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(month_start(now), "2026-10-01");
    }

    #[test]
    fn feed_is_sorted_newest_first() {
        let contacts = vec![
            model_fixtures::contact(1, "2026-10-03T00:00:00Z", ContactStatus::New),
            model_fixtures::contact(2, "2026-10-01T00:00:00Z", ContactStatus::Closed),
        ];
        let demos = vec![model_fixtures::demo(7, "2026-10-02T00:00:00Z")];

        let feed = merge_activity(&contacts, &demos);
        let order: Vec<(ActivityKind, RecordId)> = feed.iter().map(|a| (a.kind, a.id)).collect();
        assert_eq!(
            order,
            vec![
                (ActivityKind::Contact, 1),
                (ActivityKind::Demo, 7),
                (ActivityKind::Contact, 2),
            ]
        );
        assert_eq!(feed[0].title, "新用户咨询: 客户1");
        assert_eq!(feed[1].title, "演示预约: 联系人7");
        assert_eq!(feed[2].status, "已关闭");
    }
}
