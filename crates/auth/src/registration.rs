use serde::Serialize;

use tallerpro_core::{DomainResult, Draft, require_non_empty};

use crate::Role;

/// Sign-up form state, sent as-is to `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Draft for Registration {
    fn blank() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::CLIENT,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("username", &self.username)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)
    }
}
