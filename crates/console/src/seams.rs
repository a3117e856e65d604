//! Hooks the controllers call out through.

use async_trait::async_trait;

/// Something that can be told its data is out of date.
///
/// The form modal calls this once after every successful mutation.
#[async_trait]
pub trait ReloadTarget: Send + Sync {
    async fn request_reload(&self);
}

/// Asks the user before a destructive call is dispatched.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// A confirmation answered ahead of time (scripts, tests).
#[derive(Debug, Clone, Copy)]
pub struct Preconfirmed(pub bool);

#[async_trait]
impl Confirmation for Preconfirmed {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "preconfirmed");
        self.0
    }
}
