//! The one HTTP transport every resource client goes through.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use tallerpro_auth::{AuthError, CredentialSource};

use crate::{ApiError, ApiResult};

/// Path of the backend's liveness check.
pub const HEALTH_PATH: &str = "/api/health";

/// JSON-over-HTTP access to the backend rooted at one base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl HttpTransport {
    /// Anonymous transport with the client's default (no) timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_client(reqwest::Client::new(), base_url)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::from_client(http, base_url))
    }

    fn from_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            credentials: None,
        }
    }

    /// A transport sharing this one's pool and base URL that attaches the
    /// token `source` yields to every request.
    pub fn with_credentials(&self, source: Arc<dyn CredentialSource>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: Some(source),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request and hand back the raw status and body.
    ///
    /// Only a missing response is an error here; callers decide what each
    /// status means.
    pub async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ApiResult<(StatusCode, String)> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "backend request");

        let mut req = self.http.request(method, &url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok((status, text))
    }

    /// Issue a request with the current credential and classify the answer.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let token = self.credentials.as_ref().and_then(|c| c.bearer_token());
        let (status, text) = self
            .exchange(method, path, body.as_ref(), token.as_deref())
            .await?;

        if !status.is_success() {
            let err = classify(status.as_u16(), &text);
            tracing::debug!(status = status.as_u16(), path, "backend refused request: {err}");
            return Err(err);
        }
        parse_body(&text)
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn send<B>(&self, method: Method, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.request(method, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request(Method::DELETE, path, None).await.map(|_| ())
    }

    /// Whether the backend answers its health check.
    pub async fn check_connectivity(&self) -> bool {
        match self.http.get(self.url(HEALTH_PATH)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                tracing::warn!("backend unreachable: {err}");
                false
            }
        }
    }
}

fn parse_body(text: &str) -> ApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Decode the record stored under `key` of a `{msg, <key>: {...}}` envelope,
/// or the whole body when it is not wrapped.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<T> {
    let inner = match value {
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    };
    decode(inner)
}

/// The human message the backend put in an error body, if any.
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
}

fn field_errors(body: &str) -> BTreeMap<String, String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return BTreeMap::new();
    };
    let Some(errors) = value.get("errors").and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    errors
        .iter()
        .map(|(field, detail)| {
            let text = match detail {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
                other => other.to_string(),
            };
            (field.clone(), text)
        })
        .collect()
}

/// Map a non-2xx status and body onto the error taxonomy.
pub fn classify(status: u16, body: &str) -> ApiError {
    let message = server_message(body);
    match status {
        401 | 403 => ApiError::Auth(AuthError::Unauthorized),
        404 => ApiError::NotFound(message.unwrap_or_default()),
        400 | 409 | 422 => ApiError::Validation {
            message: message.unwrap_or_else(|| "invalid request".to_string()),
            fields: field_errors(body),
        },
        _ => ApiError::Transport {
            status,
            message: message.unwrap_or_else(|| body.trim().to_string()),
        },
    }
}
