// Password authentication against `/auth/v1`.
//
// Sign-in and refresh both hit the token endpoint and return a full
// session; the user lookup and logout take the session's access token
// explicitly so a stored session can be verified before it is installed.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::client::{Failure, ServiceClient, decode};
use crate::Error;

// ── Types ────────────────────────────────────────────────────────────

/// The authenticated principal as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

impl AuthUser {
    /// Email or empty string.
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

/// A signed-in session: bearer tokens plus the user they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(serialize_with = "expose", deserialize_with = "conceal")]
    pub access_token: SecretString,
    #[serde(serialize_with = "expose", deserialize_with = "conceal")]
    pub refresh_token: SecretString,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".into()
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn conceal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl Session {
    /// Whether the access token has passed its expiry (with no expiry known, never).
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now_unix)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }

    /// Fill `expires_at` from `expires_in` when the service omitted it.
    fn stamp_expiry(mut self) -> Self {
        if let (None, Some(secs)) = (self.expires_at, self.expires_in) {
            self.expires_at = Some(chrono::Utc::now().timestamp() + secs);
        }
        self
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

fn auth_failure(f: Failure) -> Error {
    let missing = f.code.as_deref() == Some("session_not_found")
        || f.message.contains("Auth session missing")
        || f.message.contains("AuthSessionMissingError");
    if missing {
        return Error::SessionMissing;
    }
    Error::Authentication { message: f.message }
}

// ── Endpoints ────────────────────────────────────────────────────────

impl ServiceClient {
    async fn token_grant<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<Session, Error> {
        let url = self.endpoint("auth/v1/token")?;
        debug!("POST {url} grant_type={grant_type}");

        let resp = self
            .request_as(Method::POST, url, None)
            .query(&[("grant_type", grant_type)])
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(auth_failure(Failure::read(resp).await));
        }
        let body = resp.text().await?;
        decode::<Session>(&body).map(Session::stamp_expiry)
    }

    /// Sign in with email + password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        self.token_grant(
            "password",
            &PasswordGrant {
                email,
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh_session(&self, refresh_token: &SecretString) -> Result<Session, Error> {
        self.token_grant(
            "refresh_token",
            &RefreshGrant {
                refresh_token: refresh_token.expose_secret(),
            },
        )
        .await
    }

    /// Resolve the user that owns `access_token`.
    ///
    /// 401/403 and "session missing" answers map to [`Error::SessionMissing`].
    pub async fn get_user(&self, access_token: &SecretString) -> Result<AuthUser, Error> {
        let url = self.endpoint("auth/v1/user")?;
        debug!("GET {url}");

        let resp = self
            .request_as(Method::GET, url, Some(access_token))
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                let body = resp.text().await?;
                decode(&body)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::SessionMissing),
            _ => Err(auth_failure(Failure::read(resp).await)),
        }
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &SecretString) -> Result<(), Error> {
        let url = self.endpoint("auth/v1/logout")?;
        debug!("POST {url}");

        let resp = self
            .request_as(Method::POST, url, Some(access_token))
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            // Already gone on the service side.
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Err(Error::SessionMissing),
            _ => Err(auth_failure(Failure::read(resp).await)),
        }
    }
}
