//! `tallerpro-auth`: who is signed in, and whether they may see a page.
//!
//! This crate is decoupled from HTTP and from any particular storage: the
//! backend login call and credential persistence are reached through the
//! `AuthBackend` and `CredentialStore` seams.

pub mod backend;
pub mod credential;
pub mod error;
pub mod gate;
pub mod identity;
pub mod registration;
pub mod roles;
pub mod session;

pub use backend::{AuthBackend, LoginGrant};
pub use credential::{
    CredentialSource, CredentialStore, CredentialStoreError, InMemoryCredentialStore,
    StaticCredential, StoredCredential,
};
pub use error::AuthError;
pub use gate::{GateDecision, RouteGate};
pub use identity::Identity;
pub use registration::Registration;
pub use roles::Role;
pub use session::{Session, SessionStore};
