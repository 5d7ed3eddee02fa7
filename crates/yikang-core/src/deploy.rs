// ── Deploy console ──
//
// Lists past deploys and triggers a new one through two server-side
// functions. Triggering needs a signed-in user; there is no retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use yikang_api::ServiceClient;

use crate::auth::AuthClient;
use crate::banner::Banners;
use crate::error::CoreError;
use crate::model::{DeployLog, DeployStats};

pub const DEPLOY_LOGS_FUNCTION: &str = "get-deploy-logs";
pub const DEPLOY_TRIGGER_FUNCTION: &str = "admin-deploy-trigger";

const LOGIN_REQUIRED: &str = "需要登录才能执行发布操作";
const DEPLOY_SUCCEEDED: &str = "网站发布成功！内容已更新。";

/// Deploy history plus aggregate counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployOverview {
    pub logs: Vec<DeployLog>,
    pub stats: DeployStats,
}

#[derive(Deserialize)]
struct LogsResponse {
    #[serde(default)]
    data: Option<Vec<DeployLog>>,
    #[serde(default)]
    stats: Option<DeployStats>,
}

impl From<LogsResponse> for DeployOverview {
    fn from(raw: LogsResponse) -> Self {
        Self {
            logs: raw.data.unwrap_or_default(),
            stats: raw.stats.unwrap_or_default(),
        }
    }
}

pub struct DeployConsole {
    client: Arc<ServiceClient>,
    auth: Arc<AuthClient>,
    overview: DeployOverview,
    loading: bool,
    deploying: bool,
    banners: Banners,
}

impl DeployConsole {
    pub fn new(client: Arc<ServiceClient>, auth: Arc<AuthClient>) -> Self {
        Self {
            client,
            auth,
            overview: DeployOverview::default(),
            loading: false,
            deploying: false,
            banners: Banners::default(),
        }
    }

    pub fn overview(&self) -> &DeployOverview {
        &self.overview
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_deploying(&self) -> bool {
        self.deploying
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    /// Fetch history and counters with the current session's bearer.
    pub async fn load_logs(&mut self) -> Result<(), CoreError> {
        self.loading = true;
        let result = self
            .client
            .invoke::<LogsResponse, _>(DEPLOY_LOGS_FUNCTION, &json!({}))
            .await;
        self.loading = false;

        match result {
            Ok(raw) => {
                self.overview = raw.into();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load deploy logs");
                let e = CoreError::from(e);
                self.banners
                    .show_error(format!("加载发布日志失败: {e}"), None);
                Err(e)
            }
        }
    }

    /// Trigger a site publish, then reload the history.
    pub async fn trigger(&mut self) -> Result<(), CoreError> {
        let user = match self.auth.require_user(LOGIN_REQUIRED) {
            Ok(user) => user,
            Err(e) => {
                self.banners.show_error(LOGIN_REQUIRED, None);
                return Err(e);
            }
        };
        if self.deploying {
            return Err(CoreError::Busy);
        }

        self.deploying = true;
        self.banners.clear();
        let result = self
            .client
            .invoke::<serde_json::Value, _>(DEPLOY_TRIGGER_FUNCTION, &json!({}))
            .await;
        self.deploying = false;

        match result {
            Ok(_) => {
                info!(by = user.email_or_empty(), "deploy triggered");
                self.banners.show_success(DEPLOY_SUCCEEDED, None);
                // History failures already surface their own banner.
                if self.load_logs().await.is_err() {
                    warn!("deploy succeeded but history reload failed");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "deploy failed");
                let e = CoreError::from(e);
                self.banners.show_error(format!("发布失败: {e}"), None);
                Err(e)
            }
        }
    }
}
