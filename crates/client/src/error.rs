use std::collections::BTreeMap;

use thiserror::Error;

use tallerpro_auth::AuthError;
use tallerpro_core::DomainError;

use crate::resource::{Operation, Resource};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend call, classified by what the caller should do about it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Rejected credential (401/403) or a refused login.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request was refused as invalid (400/409/422, or a local draft check).
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("backend error ({status}): {message}")]
    Transport { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: Resource,
        operation: Operation,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// True when the session's credential was rejected and should be dropped.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Auth(AuthError::Unauthorized))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(field) = err.field() {
            fields.insert(field.to_string(), err.to_string());
        }
        ApiError::Validation {
            message: err.to_string(),
            fields,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(inner) => inner,
            ApiError::Network(message) => AuthError::Network(message),
            ApiError::Transport { status, message } => AuthError::Backend { status, message },
            ApiError::Validation { message, .. } => AuthError::Backend {
                status: 400,
                message,
            },
            ApiError::NotFound(message) => AuthError::Backend {
                status: 404,
                message,
            },
            other => AuthError::Backend {
                status: 0,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_becomes_field_validation_error() {
        let err = ApiError::from(DomainError::MissingField("plate"));
        let ApiError::Validation { message, fields } = err else {
            panic!("expected validation error");
        };
        assert_eq!(message, "plate is required");
        assert!(fields.contains_key("plate"));
    }

    #[test]
    fn only_rejected_credentials_count_as_unauthorized() {
        assert!(ApiError::Auth(AuthError::Unauthorized).is_unauthorized());
        assert!(!ApiError::Auth(AuthError::InvalidCredentials("no".into())).is_unauthorized());
        assert!(!ApiError::NotFound("x".into()).is_unauthorized());
    }
}
