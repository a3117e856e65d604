use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tallerpro_core::UserId;

use crate::Role;

/// The authenticated user's profile, as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Identity {
    pub fn has_role(&self, required: &Role) -> bool {
        self.role.satisfies(required)
    }
}
