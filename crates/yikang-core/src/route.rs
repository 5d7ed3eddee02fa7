// ── Application mode resolution ──
//
// A location (path plus optional fragment) selects one of three modes:
// first-run setup, the admin console, or the public site.

use std::fmt;

use serde::Serialize;
use strum::{AsRefStr, EnumIter, EnumString};

/// Admin console screens, addressed as `/admin/<screen>`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRoute {
    #[default]
    Dashboard,
    News,
    Cases,
    Contacts,
    Demos,
    Deploy,
}

impl AdminRoute {
    pub fn path(self) -> String {
        format!("/admin/{}", self.as_ref())
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "仪表盘",
            Self::News => "公司动态",
            Self::Cases => "成功案例",
            Self::Contacts => "客户咨询",
            Self::Demos => "演示预约",
            Self::Deploy => "网站发布",
        }
    }

    /// Unknown or empty screen names land on the dashboard.
    pub fn from_segment(segment: &str) -> Self {
        segment.parse().unwrap_or_default()
    }
}

impl fmt::Display for AdminRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "screen", rename_all = "snake_case")]
pub enum AppMode {
    Setup,
    Admin(AdminRoute),
    PublicSite,
}

impl AppMode {
    /// Resolve a path and fragment. Setup wins over everything else.
    pub fn resolve(path: &str, hash: Option<&str>) -> Self {
        let hash = hash.map(|h| h.trim_start_matches('#'));
        let path = path.trim_end_matches('/');

        if path == "/setup" || hash == Some("setup") {
            return Self::Setup;
        }

        match path.strip_prefix("/admin") {
            Some("") => Self::Admin(AdminRoute::Dashboard),
            Some(rest) if rest.starts_with('/') => {
                let segment = rest.trim_start_matches('/');
                let segment = segment.split('/').next().unwrap_or_default();
                Self::Admin(AdminRoute::from_segment(segment))
            }
            _ => Self::PublicSite,
        }
    }

    /// Parse a location such as `/admin/news`, `#setup`, or
    /// `https://host/path#frag`.
    pub fn from_location(location: &str) -> Self {
        let without_origin = match location.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
            None => location,
        };
        let (path, hash) = match without_origin.split_once('#') {
            Some((path, hash)) => (path, Some(hash)),
            None => (without_origin, None),
        };
        let path = path.split('?').next().unwrap_or_default();
        let path = if path.is_empty() { "/" } else { path };
        Self::resolve(path, hash)
    }
}
