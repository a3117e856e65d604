use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{AuthError, Identity};

/// Successful login: the bearer token plus the profile it belongs to.
///
/// The backend names the token `access_token`; `token` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    #[serde(rename = "access_token", alias = "token")]
    pub token: String,
    #[serde(rename = "user")]
    pub identity: Identity,
}

/// The backend operations the session store needs.
///
/// Implemented over HTTP by the client crate; faked in tests.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError>;

    /// Resolve the identity a token belongs to.
    async fn current_identity(&self, token: &str) -> Result<Identity, AuthError>;
}
