//! `/auth/*` over HTTP; the session store reaches it through `AuthBackend`.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use tallerpro_auth::{AuthBackend, AuthError, Identity, LoginGrant, Registration};
use tallerpro_core::Draft;

use crate::transport::{HttpTransport, server_message, unwrap_envelope};
use crate::ApiResult;

/// Shown when the backend refuses a login without saying why.
pub const DEFAULT_LOGIN_REFUSAL: &str = "Error al iniciar sesión. Verifica tus credenciales.";

#[derive(Debug, Clone)]
pub struct AuthApi {
    transport: HttpTransport,
}

impl AuthApi {
    /// `transport` should be anonymous: login and registration carry no token,
    /// and `/auth/me` is called with the token under test.
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// `POST /auth/register`. Returns the created account.
    pub async fn register(&self, registration: &Registration) -> ApiResult<Identity> {
        registration.validate()?;
        let body = self
            .transport
            .send(Method::POST, "/auth/register", registration)
            .await?;
        let identity: Identity = unwrap_envelope(body, "user")?;
        tracing::info!(user = %identity.username, role = %identity.role, "account registered");
        Ok(identity)
    }

    /// `GET /auth/me` with an explicit token.
    pub async fn me(&self, token: &str) -> Result<Identity, AuthError> {
        let (status, text) = self
            .transport
            .exchange(Method::GET, "/auth/me", None, Some(token))
            .await?;

        match status.as_u16() {
            200..=299 => {
                let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| AuthError::Backend {
                    status: status.as_u16(),
                    message: format!("unexpected /auth/me response: {e}"),
                })?;
                Ok(unwrap_envelope(value, "user")?)
            }
            // 404: the account behind the token is gone. 422: malformed token.
            401 | 403 | 404 | 422 => Err(AuthError::Unauthorized),
            code => Err(AuthError::Backend {
                status: code,
                message: server_message(&text).unwrap_or(text),
            }),
        }
    }
}

#[async_trait]
impl AuthBackend for AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let body = json!({ "email": email, "password": password });
        let (status, text) = self
            .transport
            .exchange(Method::POST, "/auth/login", Some(&body), None)
            .await?;

        match status.as_u16() {
            200..=299 => serde_json::from_str(&text).map_err(|e| AuthError::Backend {
                status: status.as_u16(),
                message: format!("unexpected login response: {e}"),
            }),
            400 | 401 | 403 => Err(AuthError::InvalidCredentials(
                server_message(&text).unwrap_or_else(|| DEFAULT_LOGIN_REFUSAL.to_string()),
            )),
            code => Err(AuthError::Backend {
                status: code,
                message: server_message(&text).unwrap_or(text),
            }),
        }
    }

    async fn current_identity(&self, token: &str) -> Result<Identity, AuthError> {
        self.me(token).await
    }
}
