// Inbox screens: contacts and demo requests.
//
// Rows arrive from the public forms; the admin only moves them through
// their status workflow. Any status may be set from any other; the
// palette merely disables the current one. Outcome messages clear
// after 8 s.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use yikang_api::{Query, ServiceClient};

use super::{AdminTable, ListView, ScreenCore};
use crate::banner::{Banners, STATUS_BANNER_TTL};
use crate::error::CoreError;
use crate::model::{RecordId, StatusKind};
use crate::validate::FormErrors;

/// One button of the status palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry<S> {
    pub status: S,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Serialize)]
struct StatusPatch<S: Serialize> {
    status: S,
}

pub struct InboxScreen<R: AdminTable> {
    core: ScreenCore<R>,
    selected: Option<RecordId>,
    banners: Banners,
}

impl<R: AdminTable> InboxScreen<R> {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            core: ScreenCore::new(client),
            selected: None,
            banners: Banners::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), CoreError> {
        self.core.reload().await.map_err(|(e, message)| {
            self.banners.show_error(message, None);
            e
        })
    }

    pub fn list(&self) -> &ListView<R> {
        &self.core.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<R> {
        &mut self.core.list
    }

    pub fn is_loading(&self) -> bool {
        self.core.loading
    }

    pub fn is_updating(&self) -> bool {
        self.core.writing
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    // ── Detail ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: RecordId) -> Result<&R, CoreError> {
        let record = self.core.list.find(id).ok_or_else(|| CoreError::NotFound {
            entity_type: R::KIND.into(),
            identifier: id.to_string(),
        })?;
        self.selected = Some(id);
        Ok(record)
    }

    /// The selected row as of the latest load.
    pub fn selected(&self) -> Option<&R> {
        self.selected.and_then(|id| self.core.list.find(id))
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// One entry per known status, disabled for `current`.
    pub fn palette(current: R::Status) -> Vec<PaletteEntry<R::Status>> {
        R::Status::ALL
            .iter()
            .map(|&status| PaletteEntry {
                status,
                label: status.label(),
                enabled: status != current,
            })
            .collect()
    }

    // ── Status workflow ──────────────────────────────────────────────

    /// Write only `status` for row `id`, then reload.
    pub async fn set_status(&mut self, id: RecordId, status: R::Status) -> Result<(), CoreError> {
        if !R::Status::ALL.contains(&status) {
            let mut errors = FormErrors::new();
            errors.push("status", "未知状态");
            return Err(CoreError::Validation(errors));
        }

        self.core.begin_write()?;
        self.banners.clear();
        let result = self
            .core
            .client
            .update::<serde_json::Value, _>(
                R::TABLE,
                &Query::new().eq("id", id),
                &StatusPatch { status },
            )
            .await;
        self.core.end_write();

        match result {
            Ok(_) => {
                info!(table = R::TABLE, id, %status, "status updated");
                if let Err((_, message)) = self.core.reload().await {
                    self.banners.show_error(message, None);
                } else {
                    self.banners.show_success(
                        format!("状态已成功更新为: {}", status.label()),
                        Some(STATUS_BANNER_TTL),
                    );
                }
                Ok(())
            }
            Err(e) => {
                warn!(table = R::TABLE, id, error = %e, "status update failed");
                let e = CoreError::from(e);
                self.banners
                    .show_error(format!("状态更新失败: {e}"), Some(STATUS_BANNER_TTL));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, ContactStatus, DemoRequest, DemoStatus};

    #[test]
    fn palette_disables_only_current_status() {
        let palette = InboxScreen::<DemoRequest>::palette(DemoStatus::Scheduled);
        assert_eq!(palette.len(), 4);
        let enabled: Vec<_> = palette
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.status)
            .collect();
        assert_eq!(
            enabled,
            vec![DemoStatus::Pending, DemoStatus::Completed, DemoStatus::Cancelled]
        );
    }

    #[test]
    fn palette_for_unknown_status_enables_everything() {
        let palette = InboxScreen::<Contact>::palette(ContactStatus::Unknown);
        assert!(palette.iter().all(|e| e.enabled));
        assert_eq!(palette[0].label, "新咨询");
    }
}
