use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier attached to an identity.
///
/// Roles are opaque strings on the wire; the well-known ones are exposed as
/// constants. The backend spells the technician role `mecanico`, older
/// accounts may carry `technician`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const TECHNICIAN: Role = Role(Cow::Borrowed("mecanico"));
    pub const RECEPTION: Role = Role(Cow::Borrowed("recepcion"));
    pub const CLIENT: Role = Role(Cow::Borrowed("client"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == "admin"
    }

    pub fn is_technician(&self) -> bool {
        matches!(self.as_str(), "mecanico" | "technician")
    }

    /// Whether `self` satisfies `required`, folding technician aliases.
    pub fn satisfies(&self, required: &Role) -> bool {
        self == required || (self.is_technician() && required.is_technician())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technician_aliases_satisfy_each_other() {
        let legacy = Role::new("technician");
        assert!(legacy.is_technician());
        assert!(legacy.satisfies(&Role::TECHNICIAN));
        assert!(!Role::CLIENT.satisfies(&Role::ADMIN));
    }
}
