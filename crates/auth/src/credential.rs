//! Credential persistence and the read side used by the transport.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Identity;

/// What survives a restart: the token and the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub identity: Identity,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("credential storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored credential is corrupt: {0}")]
    Corrupt(String),
}

/// Persistent slot holding at most one credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError>;

    async fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError>;

    async fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// In-memory credential slot.
///
/// Intended for tests/dev; nothing outlives the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: RwLock<Option<StoredCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: StoredCredential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    async fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        *slot = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Read-only access to the current bearer token.
///
/// The session store is the only writer; every request reads through this.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (or none). Handy for scripts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialSource for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
