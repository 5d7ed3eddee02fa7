// Observable authentication state.
//
// The gate resolves the stored session once on `init`, then follows the
// `AuthClient` event stream for as long as it lives. After `teardown` no
// state update is published, including ones from calls still in flight.

use std::sync::{Arc, Weak};

use futures_core::Stream;
use secrecy::SecretString;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use yikang_api::{AuthUser, Session};

use super::client::{AuthClient, AuthEvent};
use crate::error::CoreError;

/// What the rest of the app sees of authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Stored session not resolved yet.
    Loading,
    Unauthenticated,
    Authenticated { user: AuthUser },
}

impl AuthState {
    fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(s) => Self::Authenticated {
                user: s.user.clone(),
            },
            None => Self::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Any signed-in user with an email counts as an admin.
    pub fn is_admin(&self) -> bool {
        self.user()
            .and_then(|u| u.email.as_deref())
            .is_some_and(|email| !email.is_empty())
    }
}

/// Authentication context handed to everything that needs the user.
///
/// Cheaply cloneable; all clones share one state.
#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    auth: Arc<AuthClient>,
    state: watch::Sender<AuthState>,
    cancel: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthGate {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            inner: Arc::new(GateInner {
                auth,
                state,
                cancel: CancellationToken::new(),
                listener: Mutex::new(None),
            }),
        }
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.inner.auth
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Subscribe to session changes and resolve the stored session.
    ///
    /// "No session" outcomes settle in `Unauthenticated` silently; any
    /// other failure is logged and settles there too.
    pub async fn init(&self) {
        // Subscribe first so a change racing the lookup isn't lost.
        let events = self.inner.auth.subscribe();
        let handle = tokio::spawn(listen(
            Arc::downgrade(&self.inner),
            events,
            self.inner.cancel.clone(),
        ));
        if let Some(previous) = self.inner.listener.lock().await.replace(handle) {
            previous.abort();
        }

        let resolved = match self.inner.auth.restore().await {
            Ok(session) => AuthState::from_session(session.as_ref()),
            Err(e) if e.is_session_missing() => AuthState::Unauthenticated,
            Err(e) => {
                error!(error = %e, "failed to resolve stored session");
                AuthState::Unauthenticated
            }
        };
        publish(&self.inner, resolved);
    }

    /// Stop following session changes. Idempotent.
    pub async fn teardown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.listener.lock().await.take() {
            let _ = handle.await;
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// State changes as a stream, starting with the current value.
    pub fn stream(&self) -> impl Stream<Item = AuthState> + use<> {
        WatchStream::new(self.state())
    }

    pub fn snapshot(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.snapshot().user().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        let session = self.inner.auth.sign_in(email, password).await?;
        publish(&self.inner, AuthState::from_session(Some(&session)));
        Ok(session)
    }

    pub async fn refresh(&self) -> Result<Session, CoreError> {
        let session = self.inner.auth.refresh().await?;
        publish(&self.inner, AuthState::from_session(Some(&session)));
        Ok(session)
    }

    /// Always settles in `Unauthenticated`; a session store that can't
    /// be cleared is still reported as an error.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let result = self.inner.auth.sign_out().await;
        publish(&self.inner, AuthState::Unauthenticated);
        result
    }
}

fn publish(inner: &GateInner, next: AuthState) {
    if inner.cancel.is_cancelled() {
        debug!("auth gate torn down, dropping state update");
        return;
    }
    inner.state.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next.clone();
        true
    });
}

async fn listen(
    gate: Weak<GateInner>,
    mut events: broadcast::Receiver<AuthEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(event) => {
                    let Some(inner) = gate.upgrade() else { break };
                    debug!(?event, "auth event");
                    publish(&inner, AuthState::from_session(event.session()));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "auth listener lagged behind session changes");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}
