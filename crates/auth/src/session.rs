//! Session store: the single owner of the signed-in identity and its token.
//!
//! Every other component reads the session through a handle (`snapshot`,
//! `subscribe`, or the `CredentialSource` impl). Only the methods on
//! `SessionStore` write it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    AuthBackend, AuthError, CredentialSource, CredentialStore, Identity, StoredCredential,
};

/// Current authentication state.
///
/// Invariant: `identity` is present iff `token` is present.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    token: Option<String>,
    hydrating: bool,
}

impl Session {
    /// State at process start, before the stored credential has been read.
    pub fn hydrating() -> Self {
        Self {
            identity: None,
            token: None,
            hydrating: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            token: None,
            hydrating: false,
        }
    }

    pub fn signed_in(token: String, identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            token: Some(token),
            hydrating: false,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_hydrating(&self) -> bool {
        self.hydrating
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("hydrating", &self.hydrating)
            .finish()
    }
}

struct Inner {
    state: watch::Sender<Session>,
    backend: Arc<dyn AuthBackend>,
    credentials: Arc<dyn CredentialStore>,
}

/// Cheaply cloneable handle to the one session of the process.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create the store. The session starts out hydrating; call
    /// [`SessionStore::hydrate`] once at startup.
    pub fn new(backend: Arc<dyn AuthBackend>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::hydrating());
        Self {
            inner: Arc::new(Inner {
                state,
                backend,
                credentials,
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    fn publish(&self, session: Session) {
        self.inner.state.send_replace(session);
    }

    /// Recover the credential persisted by a previous run.
    ///
    /// No network validation happens here. An unreadable credential is
    /// discarded and the session comes up signed out.
    pub async fn hydrate(&self) -> Option<Identity> {
        self.inner.state.send_modify(|s| s.hydrating = true);

        let restored = match self.inner.credentials.load().await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("discarding stored credential: {err}");
                if let Err(err) = self.inner.credentials.clear().await {
                    tracing::warn!("failed to clear stored credential: {err}");
                }
                None
            }
        };

        match restored {
            Some(StoredCredential { token, identity }) => {
                tracing::info!(user = %identity.username, "session restored");
                self.publish(Session::signed_in(token, identity.clone()));
                Some(identity)
            }
            None => {
                tracing::debug!("no stored credential");
                self.publish(Session::signed_out());
                None
            }
        }
    }

    /// Exchange email/password for a token.
    ///
    /// On failure the session is left exactly as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let grant = self.inner.backend.login(email, password).await.map_err(|err| {
            tracing::warn!("login failed: {err}");
            err
        })?;

        let credential = StoredCredential {
            token: grant.token,
            identity: grant.identity,
        };
        if let Err(err) = self.inner.credentials.save(&credential).await {
            tracing::warn!("failed to persist credential; session will not survive a restart: {err}");
        }

        let identity = credential.identity.clone();
        self.publish(Session::signed_in(credential.token, credential.identity));
        tracing::info!(user = %identity.username, role = %identity.role, "signed in");
        Ok(identity)
    }

    /// Sign out. The in-memory session is cleared before the first await, so
    /// readers observe the signed-out state immediately.
    pub async fn logout(&self) {
        self.publish(Session::signed_out());
        tracing::info!("signed out");
        if let Err(err) = self.inner.credentials.clear().await {
            tracing::warn!("failed to clear stored credential: {err}");
        }
    }

    /// Drop the session because the backend rejected its credential.
    pub async fn invalidate(&self, reason: &str) {
        if !self.is_authenticated() {
            return;
        }
        tracing::warn!(reason, "session invalidated");
        self.publish(Session::signed_out());
        if let Err(err) = self.inner.credentials.clear().await {
            tracing::warn!("failed to clear stored credential: {err}");
        }
    }

    /// Ask the backend who the current token belongs to.
    ///
    /// A rejected token invalidates the session; any other failure leaves it
    /// untouched.
    pub async fn revalidate(&self) -> Result<Option<Identity>, AuthError> {
        let Some(token) = self.snapshot().token else {
            return Ok(None);
        };

        match self.inner.backend.current_identity(&token).await {
            Ok(identity) => {
                if self.snapshot().token() != Some(token.as_str()) {
                    // Signed out or re-logged in while the request was in flight.
                    return Ok(self.identity());
                }
                let credential = StoredCredential {
                    token: token.clone(),
                    identity: identity.clone(),
                };
                if let Err(err) = self.inner.credentials.save(&credential).await {
                    tracing::warn!("failed to persist refreshed identity: {err}");
                }
                self.publish(Session::signed_in(token, identity.clone()));
                Ok(Some(identity))
            }
            Err(AuthError::Unauthorized) => {
                self.invalidate("token rejected on revalidation").await;
                Err(AuthError::Unauthorized)
            }
            Err(err) => Err(err),
        }
    }
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tallerpro_core::UserId;

    use crate::{CredentialStoreError, InMemoryCredentialStore, LoginGrant, Role};

    struct FakeBackend;

    fn ana() -> Identity {
        Identity {
            id: UserId::new(1),
            username: "ana".into(),
            email: "ana@taller.pro".into(),
            role: Role::ADMIN,
            created_at: None,
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
            match (email, password) {
                ("ana@taller.pro", "secret") => Ok(LoginGrant {
                    token: "tok-1".into(),
                    identity: ana(),
                }),
                ("offline@taller.pro", _) => Err(AuthError::Network("connection refused".into())),
                _ => Err(AuthError::InvalidCredentials("Credenciales inválidas".into())),
            }
        }

        async fn current_identity(&self, token: &str) -> Result<Identity, AuthError> {
            match token {
                "tok-1" => Ok(Identity {
                    username: "ana.p".into(),
                    ..ana()
                }),
                "tok-down" => Err(AuthError::Network("timeout".into())),
                _ => Err(AuthError::Unauthorized),
            }
        }
    }

    struct CorruptStore;

    #[async_trait]
    impl CredentialStore for CorruptStore {
        async fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError> {
            Err(CredentialStoreError::Corrupt("not json".into()))
        }

        async fn save(&self, _: &StoredCredential) -> Result<(), CredentialStoreError> {
            Ok(())
        }

        async fn clear(&self) -> Result<(), CredentialStoreError> {
            Ok(())
        }
    }

    fn store_with(credentials: Arc<dyn CredentialStore>) -> SessionStore {
        SessionStore::new(Arc::new(FakeBackend), credentials)
    }

    #[tokio::test]
    async fn starts_hydrating_and_settles_signed_out_without_stored_token() {
        let store = store_with(Arc::new(InMemoryCredentialStore::new()));
        assert!(store.snapshot().is_hydrating());

        assert_eq!(store.hydrate().await, None);
        let session = store.snapshot();
        assert!(!session.is_hydrating());
        assert!(!session.is_authenticated());
        assert_eq!(store.bearer_token(), None);
    }

    #[tokio::test]
    async fn hydrate_restores_persisted_credential() {
        let credentials = Arc::new(InMemoryCredentialStore::with_credential(StoredCredential {
            token: "tok-1".into(),
            identity: ana(),
        }));
        let store = store_with(credentials);

        assert_eq!(store.hydrate().await, Some(ana()));
        assert_eq!(store.bearer_token().as_deref(), Some("tok-1"));
        assert!(!store.snapshot().is_hydrating());
    }

    #[tokio::test]
    async fn corrupt_credential_is_treated_as_absent() {
        let store = store_with(Arc::new(CorruptStore));
        assert_eq!(store.hydrate().await, None);
        assert!(!store.is_authenticated());
        assert!(!store.snapshot().is_hydrating());
    }

    #[tokio::test]
    async fn login_stores_token_and_persists_it() {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let store = store_with(credentials.clone());
        store.hydrate().await;

        let identity = store.login("ana@taller.pro", "secret").await.unwrap();
        assert_eq!(identity, ana());
        assert_eq!(store.bearer_token().as_deref(), Some("tok-1"));

        let persisted = credentials.load().await.unwrap().unwrap();
        assert_eq!(persisted.token, "tok-1");
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let store = store_with(Arc::new(InMemoryCredentialStore::new()));
        store.hydrate().await;
        let before = store.snapshot();

        let err = store.login("ana@taller.pro", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(store.snapshot(), before);

        let err = store.login("offline@taller.pro", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn logout_clears_session_and_storage_and_notifies_subscribers() {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let store = store_with(credentials.clone());
        store.hydrate().await;
        store.login("ana@taller.pro", "secret").await.unwrap();

        let mut rx = store.subscribe();
        rx.mark_unchanged();
        store.logout().await;

        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());
        assert_eq!(store.bearer_token(), None);
        assert_eq!(credentials.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn revalidate_refreshes_identity_or_invalidates() {
        let credentials = Arc::new(InMemoryCredentialStore::with_credential(StoredCredential {
            token: "tok-1".into(),
            identity: ana(),
        }));
        let store = store_with(credentials.clone());
        store.hydrate().await;

        let refreshed = store.revalidate().await.unwrap().unwrap();
        assert_eq!(refreshed.username, "ana.p");

        credentials
            .save(&StoredCredential {
                token: "tok-expired".into(),
                identity: ana(),
            })
            .await
            .unwrap();
        store.hydrate().await;
        assert_eq!(store.revalidate().await, Err(AuthError::Unauthorized));
        assert!(!store.is_authenticated());
        assert_eq!(credentials.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn revalidate_keeps_session_on_network_failure() {
        let store = store_with(Arc::new(InMemoryCredentialStore::with_credential(
            StoredCredential {
                token: "tok-down".into(),
                identity: ana(),
            },
        )));
        store.hydrate().await;

        assert!(matches!(store.revalidate().await, Err(AuthError::Network(_))));
        assert!(store.is_authenticated());
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let session = Session::signed_in("super-secret".into(), ana());
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
