use thiserror::Error;

/// Authentication failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the email/password pair. Carries the server message.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A protected call was rejected (401/403): the session is no longer valid.
    #[error("unauthorized")]
    Unauthorized,

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with something other than success or refusal.
    #[error("auth backend error ({status}): {message}")]
    Backend { status: u16, message: String },
}
