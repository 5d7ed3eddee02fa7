// ── Status vocabularies ──
//
// Each table has its own closed set of status strings. Values the
// client doesn't know (added server-side later) land in `Unknown`
// instead of failing the whole list.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// Common surface of the status enums.
pub trait StatusKind:
    Copy + Eq + fmt::Display + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// Every known status, in palette order.
    const ALL: &'static [Self];

    /// Wire value (`"new"`, `"in_progress"`, ...).
    fn as_str(self) -> &'static str;

    /// Localized label shown in the admin.
    fn label(self) -> &'static str;

    /// Parse a wire value; unknown strings yield `None`.
    fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == raw)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
    Closed,
    #[serde(other)]
    Unknown,
}

impl StatusKind for ContactStatus {
    const ALL: &'static [Self] = &[Self::New, Self::Contacted, Self::Closed];

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        match self {
            Self::New => "新咨询",
            Self::Contacted => "已联系",
            Self::Closed => "已关闭",
            Self::Unknown => "未知",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DemoStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl StatusKind for DemoStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Scheduled,
        Self::Completed,
        Self::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "待处理",
            Self::Scheduled => "已安排",
            Self::Completed => "已完成",
            Self::Cancelled => "已取消",
            Self::Unknown => "未知",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NewsStatus {
    #[default]
    Draft,
    Published,
    Archived,
    #[serde(other)]
    Unknown,
}

impl StatusKind for NewsStatus {
    const ALL: &'static [Self] = &[Self::Draft, Self::Published, Self::Archived];

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Draft => "草稿",
            Self::Published => "已发布",
            Self::Archived => "已归档",
            Self::Unknown => "未知",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Draft,
    Active,
    Archived,
    #[serde(other)]
    Unknown,
}

impl StatusKind for CaseStatus {
    const ALL: &'static [Self] = &[Self::Draft, Self::Active, Self::Archived];

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Draft => "草稿",
            Self::Active => "激活",
            Self::Archived => "已归档",
            Self::Unknown => "未知",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeployStatus {
    #[default]
    Triggered,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl StatusKind for DeployStatus {
    const ALL: &'static [Self] = &[
        Self::Triggered,
        Self::InProgress,
        Self::Completed,
        Self::Failed,
    ];

    fn as_str(self) -> &'static str {
        self.into()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Triggered => "已触发",
            Self::InProgress => "进行中",
            Self::Completed => "成功",
            Self::Failed => "失败",
            Self::Unknown => "未知",
        }
    }
}
