#![allow(clippy::unwrap_used)]
// Auth gate lifecycle: init, sign-in/out, listener propagation, teardown.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yikang_api::ServiceClient;
use tokio_stream::StreamExt;
use yikang_core::{
    AuthEvent, AuthState, Backend, CoreError, MemorySessionStore, ServiceConfig, Session,
    SessionStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn session_json(token: &str, email: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 4_102_444_800_i64,
        "refresh_token": format!("{token}-refresh"),
        "user": { "id": "8d0f", "email": email }
    })
}

fn stored_session() -> Session {
    serde_json::from_value(session_json("stored-jwt", "admin@example.com")).unwrap()
}

async fn setup(store: Arc<impl SessionStore + 'static>) -> (MockServer, Backend) {
    let server = MockServer::start().await;
    let client = ServiceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("anon-key".to_owned()),
    );
    let backend = Backend::from_client(Arc::new(client), store);
    (server, backend)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

/// Keeps sessions in memory but can never forget one.
struct ReadOnlyStore(MemorySessionStore);

impl SessionStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        self.0.load()
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        self.0.save(session)
    }

    fn clear(&self) -> Result<(), CoreError> {
        Err(CoreError::Internal("session file is read-only".into()))
    }
}

async fn mount_sign_in_and_out(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_json("user-jwt", "admin@example.com")),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

// ── Init ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_without_session_settles_unauthenticated() {
    let (server, backend) = setup(Arc::new(MemorySessionStore::new())).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(backend.gate().snapshot().is_loading());
    backend.init().await;
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
    assert!(!backend.gate().is_admin());
    backend.shutdown().await;
}

#[tokio::test]
async fn test_init_restores_stored_session() {
    let store = Arc::new(MemorySessionStore::with_session(stored_session()));
    let (server, backend) = setup(Arc::clone(&store)).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer stored-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8d0f", "email": "admin@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    backend.init().await;
    assert!(backend.gate().is_admin());
    assert_eq!(
        backend.gate().user().unwrap().email.as_deref(),
        Some("admin@example.com")
    );
    assert!(backend.client().has_access_token());
    backend.shutdown().await;
}

#[tokio::test]
async fn test_rejected_session_is_dropped_silently() {
    let store = Arc::new(MemorySessionStore::with_session(stored_session()));
    let (server, backend) = setup(Arc::clone(&store)).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401, "msg": "invalid JWT"
        })))
        .mount(&server)
        .await;

    backend.init().await;
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
    assert!(store.load().unwrap().is_none());
    backend.shutdown().await;
}

#[tokio::test]
async fn test_oneshot_runs_with_restored_session_then_tears_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8d0f", "email": "admin@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ServiceConfig::new(Url::parse(&server.uri()).unwrap(), secret("anon-key"));
    let store = Arc::new(MemorySessionStore::with_session(stored_session()));
    let (email, backend) = Backend::oneshot(&config, store, |backend| async move {
        let email = backend.gate().user().and_then(|u| u.email);
        Ok::<_, CoreError>((email, backend))
    })
    .await
    .unwrap();

    assert_eq!(email.as_deref(), Some("admin@example.com"));
    assert!(backend.gate().is_torn_down());
}

// ── Operations ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_then_out() {
    let store = Arc::new(MemorySessionStore::new());
    let (server, backend) = setup(Arc::clone(&store)).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_json("user-jwt", "admin@example.com")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend.init().await;
    let mut states = backend.gate().state();

    backend
        .gate()
        .sign_in("admin@example.com", &secret("pw"))
        .await
        .unwrap();
    assert!(states.has_changed().unwrap());
    assert!(states.borrow_and_update().is_admin());
    assert!(store.load().unwrap().is_some());

    backend.gate().sign_out().await.unwrap();
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
    assert!(store.load().unwrap().is_none());
    assert!(!backend.client().has_access_token());
    backend.shutdown().await;
}

#[tokio::test]
async fn test_state_stream_follows_sign_in_and_out() {
    let (server, backend) = setup(Arc::new(MemorySessionStore::new())).await;
    mount_sign_in_and_out(&server).await;

    backend.init().await;
    let mut stream = std::pin::pin!(backend.gate().stream());
    let wait = Duration::from_secs(5);
    assert_eq!(
        tokio::time::timeout(wait, stream.next()).await.unwrap(),
        Some(AuthState::Unauthenticated)
    );

    backend
        .gate()
        .sign_in("admin@example.com", &secret("pw"))
        .await
        .unwrap();
    let signed_in = tokio::time::timeout(wait, stream.next()).await.unwrap().unwrap();
    assert!(signed_in.is_admin());

    backend.gate().sign_out().await.unwrap();
    assert_eq!(
        tokio::time::timeout(wait, stream.next()).await.unwrap(),
        Some(AuthState::Unauthenticated)
    );
    backend.shutdown().await;
}

#[tokio::test]
async fn test_sign_out_settles_even_when_store_cannot_clear() {
    let store = Arc::new(ReadOnlyStore(MemorySessionStore::new()));
    let (server, backend) = setup(store).await;
    mount_sign_in_and_out(&server).await;

    backend.init().await;
    backend
        .gate()
        .sign_in("admin@example.com", &secret("pw"))
        .await
        .unwrap();
    let mut events = backend.auth().subscribe();

    let err = backend.gate().sign_out().await.unwrap_err();
    assert!(err.to_string().contains("read-only"));
    assert!(matches!(events.try_recv().unwrap(), AuthEvent::SignedOut));
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
    assert!(backend.auth().session().is_none());
    assert!(!backend.client().has_access_token());
    backend.shutdown().await;
}

#[tokio::test]
async fn test_wrong_password_leaves_state_alone() {
    let (server, backend) = setup(Arc::new(MemorySessionStore::new())).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    backend.init().await;
    let err = backend
        .gate()
        .sign_in("admin@example.com", &secret("wrong"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid login credentials"));
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
    backend.shutdown().await;
}

#[tokio::test]
async fn test_refresh_outside_gate_reaches_listener() {
    let store = Arc::new(MemorySessionStore::with_session(stored_session()));
    let (server, backend) = setup(store).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8d0f", "email": "admin@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_json("fresh-jwt", "ops@example.com")),
        )
        .mount(&server)
        .await;

    backend.init().await;
    let mut states = backend.gate().state();
    states.borrow_and_update();

    backend.auth().refresh().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), states.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        states.borrow().user().unwrap().email.as_deref(),
        Some("ops@example.com")
    );
    backend.shutdown().await;
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_updates_after_teardown() {
    let (server, backend) = setup(Arc::new(MemorySessionStore::new())).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_json("user-jwt", "admin@example.com")),
        )
        .mount(&server)
        .await;

    backend.init().await;
    backend.shutdown().await;
    backend.shutdown().await;
    assert!(backend.gate().is_torn_down());

    backend
        .gate()
        .sign_in("admin@example.com", &secret("pw"))
        .await
        .unwrap();
    assert_eq!(backend.gate().snapshot(), AuthState::Unauthenticated);
}
