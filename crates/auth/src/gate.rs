//! Route gate: decides what a protected page shows for a given session.

use tokio::sync::watch;

use crate::{Role, Session};

/// Outcome of evaluating a protected route. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The stored credential is still being recovered; show a placeholder.
    Loading,
    /// Not signed in. `replace` means the current history entry is replaced,
    /// so "back" does not return to the protected page.
    Redirect { to: String, replace: bool },
    /// Signed in; render the protected content.
    Render,
    /// Signed in, but without any of the roles this route requires.
    Forbidden,
}

/// Stateless gate in front of a protected subtree.
///
/// Every call to [`RouteGate::evaluate`] looks at the session it is given;
/// nothing is cached between evaluations.
#[derive(Debug, Clone)]
pub struct RouteGate {
    login_path: String,
    required_roles: Vec<Role>,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGate {
    pub const DEFAULT_LOGIN_PATH: &'static str = "/login";

    pub fn new() -> Self {
        Self {
            login_path: Self::DEFAULT_LOGIN_PATH.to_string(),
            required_roles: Vec::new(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Restrict the route to identities holding at least one of `roles`.
    pub fn require_any_role(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = roles.into_iter().collect();
        self
    }

    pub fn evaluate(&self, session: &Session) -> GateDecision {
        if session.is_hydrating() {
            return GateDecision::Loading;
        }

        let Some(identity) = session.identity() else {
            return GateDecision::Redirect {
                to: self.login_path.clone(),
                replace: true,
            };
        };

        if self.required_roles.is_empty()
            || self.required_roles.iter().any(|role| identity.has_role(role))
        {
            GateDecision::Render
        } else {
            GateDecision::Forbidden
        }
    }

    /// Wait for the next session transition and re-evaluate.
    ///
    /// Returns `None` once the session store is gone.
    pub async fn next_decision(&self, rx: &mut watch::Receiver<Session>) -> Option<GateDecision> {
        rx.changed().await.ok()?;
        let session = rx.borrow_and_update().clone();
        Some(self.evaluate(&session))
    }
}
