// Session owner: signs in and out against the service, keeps the
// current session installed on the HTTP client, persists it through the
// `SessionStore`, and broadcasts every change.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::SecretString;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use yikang_api::{AuthUser, ServiceClient, Session};

use super::store::SessionStore;
use crate::error::CoreError;

const EVENT_CHANNEL_SIZE: usize = 16;

/// Session-change notification.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl AuthEvent {
    /// The session in effect after this event.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(s) | Self::TokenRefreshed(s) => Some(s),
            Self::SignedOut => None,
        }
    }
}

pub struct AuthClient {
    client: Arc<ServiceClient>,
    store: Arc<dyn SessionStore>,
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthClient {
    pub fn new(client: Arc<ServiceClient>, store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            client,
            store,
            session: Mutex::new(None),
            events,
        }
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.session().map(|s| s.user)
    }

    /// The signed-in user, or `NotAuthenticated` carrying `message`.
    pub fn require_user(&self, message: &str) -> Result<AuthUser, CoreError> {
        self.user().ok_or_else(|| CoreError::not_authenticated(message))
    }

    fn install(&self, session: Option<Session>) {
        self.client
            .set_access_token(session.as_ref().map(|s| s.access_token.clone()));
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn forget(&self) -> Result<(), CoreError> {
        self.install(None);
        self.store.clear()
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn adopt(&self, session: &Session) -> Result<(), CoreError> {
        self.store.save(session)?;
        self.install(Some(session.clone()));
        Ok(())
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Resolve the persisted session, if any, against the service.
    ///
    /// An expired access token is refreshed first. A session the service
    /// no longer recognizes is dropped and reported as `Ok(None)`.
    pub async fn restore(&self) -> Result<Option<Session>, CoreError> {
        let Some(stored) = self.store.load()? else {
            debug!("no stored session");
            return Ok(None);
        };

        let mut session = if stored.is_expired() {
            match self.client.refresh_session(&stored.refresh_token).await {
                Ok(fresh) => {
                    self.store.save(&fresh)?;
                    fresh
                }
                Err(e) if e.is_auth_expired() => {
                    debug!(error = %e, "stored session could not be refreshed");
                    self.forget()?;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            stored
        };

        match self.client.get_user(&session.access_token).await {
            Ok(user) => {
                session.user = user;
                self.install(Some(session.clone()));
                Ok(Some(session))
            }
            Err(e) if e.is_session_missing() => {
                debug!("stored session no longer valid");
                self.forget()?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Password sign-in. Persists the session and emits `SignedIn`.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        let session = self
            .client
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| match CoreError::from(e) {
                CoreError::SessionMissing => CoreError::AuthenticationFailed {
                    message: "Auth session missing!".into(),
                },
                other => other,
            })?;
        info!(email, "signed in");

        self.adopt(&session)?;
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Exchange the refresh token. Persists and emits `TokenRefreshed`.
    pub async fn refresh(&self) -> Result<Session, CoreError> {
        let current = self.session().ok_or(CoreError::SessionMissing)?;
        let session = self.client.refresh_session(&current.refresh_token).await?;
        debug!("session refreshed");

        self.adopt(&session)?;
        self.emit(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Revoke remotely (best effort), then clear local state and emit `SignedOut`.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        if let Some(current) = self.session() {
            match self.client.sign_out(&current.access_token).await {
                Ok(()) => {}
                Err(e) if e.is_session_missing() => debug!("session already gone remotely"),
                Err(e) => warn!(error = %e, "remote sign-out failed, clearing local session"),
            }
        }

        // Local state is gone even when the store can't be cleared, so
        // subscribers hear about it before the error surfaces.
        let cleared = self.forget();
        info!("signed out");
        self.emit(AuthEvent::SignedOut);
        cleared
    }
}
