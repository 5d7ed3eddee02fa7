// Async HTTP client for the hosted backend.
//
// One client serves three surfaces under a single project URL:
//   /rest/v1/{table}      row access (PostgREST dialect)
//   /auth/v1/...          password sign-in, refresh, logout, user lookup
//   /functions/v1/{name}  server-side functions
//
// Every request carries `apikey: <anon key>` and a bearer token: the
// signed-in user's access token when one is set, the anon key otherwise.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Error response shapes ────────────────────────────────────────────
//
// Tables answer `{code, message, details, hint}`; auth answers either
// `{error, error_description}` or `{code, msg}`; functions answer
// `{error: "..."}` or `{error: {code, message}}`.

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    hint: Option<String>,
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| match &self.error {
                Some(serde_json::Value::Object(inner)) => {
                    inner.get("message").and_then(value_text)
                }
                Some(other) => value_text(other),
                None => None,
            })
    }

    fn code(&self) -> Option<String> {
        self.error_code
            .clone()
            .or_else(|| self.code.as_ref().and_then(value_text))
            .or_else(|| match &self.error {
                Some(serde_json::Value::Object(inner)) => inner.get("code").and_then(value_text),
                _ => None,
            })
    }
}

/// A non-success response, decoded as far as the body allows.
///
/// Each surface turns this into its own [`Error`] variant.
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl Failure {
    pub(crate) async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&raw) {
            Ok(body) => Self {
                status,
                code: body.code(),
                message: body.message().unwrap_or_else(|| status.to_string()),
                details: body.details.as_ref().and_then(value_text),
                hint: body.hint,
            },
            Err(_) => Self {
                status,
                code: None,
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                details: None,
                hint: None,
            },
        }
    }
}

impl From<Failure> for Error {
    fn from(f: Failure) -> Self {
        Error::Remote {
            status: f.status.as_u16(),
            code: f.code,
            message: f.message,
            details: f.details,
            hint: f.hint,
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the hosted backend (tables, auth, functions).
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    access_token: RwLock<Option<SecretString>>,
}

impl ServiceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a project URL, the public anon key, and transport config.
    ///
    /// Injects `apikey` as a default header on every request.
    pub fn new(
        base_url: &str,
        anon_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(anon_key.expose_secret())
            .map_err(|e| Error::InvalidAnonKey(e.to_string()))?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);

        let http = transport.build_client(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self::with_client(http, base_url, anon_key.clone()))
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// The `apikey` header is still attached per request, so a bare
    /// client (as used by tests) behaves like one built with [`Self::new`].
    pub fn with_client(http: reqwest::Client, base_url: Url, anon_key: SecretString) -> Self {
        let base_url = Self::normalize_base_url(base_url.as_str()).unwrap_or(base_url);
        Self {
            http,
            base_url,
            anon_key,
            access_token: RwLock::new(None),
        }
    }

    /// Ensure the base path ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized project URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session token ────────────────────────────────────────────────

    /// Install (or clear) the user access token used as bearer.
    pub fn set_access_token(&self, token: Option<SecretString>) {
        let mut guard = self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    /// Whether a user access token is installed.
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn bearer(&self) -> String {
        let guard = self
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => token.expose_secret().to_owned(),
            None => self.anon_key.expose_secret().to_owned(),
        }
    }

    // ── Request plumbing ─────────────────────────────────────────────

    /// Join a relative path (e.g. `"rest/v1/news"`) onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Start a request carrying `apikey` and the current bearer.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.request_as(method, url, None)
    }

    /// Start a request with an explicit bearer token overriding the installed one.
    pub(crate) fn request_as(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let bearer = token.map_or_else(|| self.bearer(), |t| t.expose_secret().to_owned());
        self.http
            .request(method, url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer)
    }

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode(&body)
        } else {
            Err(Failure::read(resp).await.into())
        }
    }

    pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Failure::read(resp).await.into())
        }
    }
}

/// Decode a JSON body, keeping a preview of it on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ServiceClient {
        ServiceClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            SecretString::from("anon".to_owned()),
        )
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let c = client("https://abc.example.co/base");
        assert_eq!(c.base_url().as_str(), "https://abc.example.co/base/");
        let url = c.endpoint("rest/v1/news").unwrap();
        assert_eq!(url.as_str(), "https://abc.example.co/base/rest/v1/news");
    }

    #[test]
    fn bearer_falls_back_to_anon_key() {
        let c = client("https://abc.example.co");
        assert_eq!(c.bearer(), "anon");
        c.set_access_token(Some(SecretString::from("user-jwt".to_owned())));
        assert!(c.has_access_token());
        assert_eq!(c.bearer(), "user-jwt");
        c.set_access_token(None);
        assert_eq!(c.bearer(), "anon");
    }

    #[test]
    fn error_body_prefers_message_then_description() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .unwrap();
        assert_eq!(body.message().as_deref(), Some("Invalid login credentials"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"code":"42P01","message":"relation \"news\" does not exist"}"#)
                .unwrap();
        assert_eq!(body.code().as_deref(), Some("42P01"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"error":{"code":"UPLOAD_FAILED","message":"bucket missing"}}"#)
                .unwrap();
        assert_eq!(body.message().as_deref(), Some("bucket missing"));
        assert_eq!(body.code().as_deref(), Some("UPLOAD_FAILED"));
    }

    #[test]
    fn decode_keeps_body_on_failure() {
        let err = decode::<Vec<i32>>("not json").unwrap_err();
        assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "not json"));
    }
}
