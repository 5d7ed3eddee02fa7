// Server-side function invocation (`POST /functions/v1/{name}`).

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{Failure, ServiceClient, decode};
use crate::Error;

impl ServiceClient {
    /// Invoke a function with a JSON body and decode its JSON answer.
    ///
    /// The bearer is the installed access token (or the anon key when
    /// signed out); functions that require a user reject the latter.
    pub async fn invoke<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.endpoint(&format!("functions/v1/{name}"))?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).json(body).send().await?;

        if !resp.status().is_success() {
            let f = Failure::read(resp).await;
            return Err(Error::Function {
                name: name.to_owned(),
                status: f.status.as_u16(),
                message: f.message,
            });
        }

        let text = resp.text().await?;
        // Some functions answer 200 with an `{error: ...}` envelope.
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&text) {
            if let Some(err) = map.get("error").filter(|e| !e.is_null()) {
                let message = err
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
                    .or_else(|| err.as_str().map(str::to_owned))
                    .unwrap_or_else(|| err.to_string());
                return Err(Error::Function {
                    name: name.to_owned(),
                    status: 200,
                    message,
                });
            }
        }
        decode(&text)
    }
}
