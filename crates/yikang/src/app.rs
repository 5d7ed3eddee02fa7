//! The connected application root.
//!
//! Owns the `Backend` (client, session store, auth gate) for one run of
//! the CLI. The gate is initialized on connect and torn down on close.

use std::sync::Arc;

use tracing::{debug, info};

use yikang_config::FileSessionStore;
use yikang_core::{AuthUser, Backend};

use crate::cli::GlobalOpts;
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

const ADMIN_REQUIRED: &str = "管理后台需要管理员登录";

pub struct App {
    backend: Backend,
    profile_name: String,
    profile: Option<Profile>,
    color: bool,
}

impl App {
    /// Resolve config, build the backend, and restore any stored session.
    pub async fn connect(global: &GlobalOpts) -> Result<Self, CliError> {
        let resolved = config::resolve(global)?;
        let store = Arc::new(FileSessionStore::for_profile(&resolved.profile_name));
        debug!(
            profile = %resolved.profile_name,
            url = %resolved.service.url,
            session = %store.path().display(),
            "connecting"
        );

        let backend = Backend::new(&resolved.service, store)?;
        backend.init().await;

        Ok(Self {
            backend,
            profile_name: resolved.profile_name,
            profile: resolved.profile,
            color: output::should_color(&global.color),
        })
    }

    pub async fn close(&self) {
        self.backend.shutdown().await;
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// The signed-in admin, signing in with stored credentials if the
    /// profile has them.
    pub async fn require_admin(&self) -> Result<AuthUser, CliError> {
        let gate = self.backend.gate();
        if let Some(user) = gate.user().filter(|_| gate.is_admin()) {
            return Ok(user);
        }

        let fallback = Profile::default();
        let profile = self.profile.as_ref().unwrap_or(&fallback);
        let Ok((email, password)) = yikang_config::resolve_sign_in(profile, &self.profile_name)
        else {
            return Err(CliError::NotSignedIn {
                message: ADMIN_REQUIRED.into(),
            });
        };

        info!(email, profile = %self.profile_name, "signing in with stored credentials");
        let session = gate.sign_in(&email, &password).await?;
        if !gate.is_admin() {
            return Err(CliError::NotSignedIn {
                message: ADMIN_REQUIRED.into(),
            });
        }
        Ok(session.user)
    }
}
