// ── Backend facade ──
//
// One handle over the configured service: the shared HTTP client, the
// session owner, and the auth gate. Screens borrow what they need from
// it; everything is behind `Arc`, so clones are cheap.

use std::future::Future;
use std::sync::Arc;

use yikang_api::ServiceClient;

use crate::auth::{AuthClient, AuthGate, SessionStore};
use crate::config::ServiceConfig;
use crate::error::CoreError;
use crate::site::SiteData;

#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    client: Arc<ServiceClient>,
    gate: AuthGate,
}

impl Backend {
    /// Build from configuration. Does not touch the network; call
    /// [`init`](Self::init) to resolve the stored session.
    pub fn new(config: &ServiceConfig, store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let client = Arc::new(config.build_client()?);
        Ok(Self::from_client(client, store))
    }

    /// Wrap an already-built client.
    pub fn from_client(client: Arc<ServiceClient>, store: Arc<dyn SessionStore>) -> Self {
        let auth = Arc::new(AuthClient::new(Arc::clone(&client), store));
        let gate = AuthGate::new(auth);
        Self {
            inner: Arc::new(BackendInner { client, gate }),
        }
    }

    pub async fn init(&self) {
        self.inner.gate.init().await;
    }

    pub async fn shutdown(&self) {
        self.inner.gate.teardown().await;
    }

    /// Build, init, run `f`, then tear down, returning `f`'s result.
    pub async fn oneshot<F, Fut, T>(
        config: &ServiceConfig,
        store: Arc<dyn SessionStore>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Backend) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let backend = Self::new(config, store)?;
        backend.init().await;
        let result = f(backend.clone()).await;
        backend.shutdown().await;
        result
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn client(&self) -> &Arc<ServiceClient> {
        &self.inner.client
    }

    pub fn gate(&self) -> &AuthGate {
        &self.inner.gate
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        self.inner.gate.auth()
    }

    /// Public data-access wrapper over the shared client.
    pub fn site(&self) -> SiteData {
        SiteData::new(Arc::clone(&self.inner.client))
    }
}
