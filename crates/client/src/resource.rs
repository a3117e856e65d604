//! The shared contract every resource client implements.

use core::fmt;

use async_trait::async_trait;

use tallerpro_core::{Draft, Entity};
use tallerpro_workshop::Searchable;

use crate::{ApiError, ApiResult};

/// Backend-managed record types, plus the auth endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vehicles,
    Clients,
    Technicians,
    Orders,
    Services,
    Payments,
    Marketplace,
    Auth,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicles",
            Resource::Clients => "clients",
            Resource::Technicians => "technicians",
            Resource::Orders => "orders",
            Resource::Services => "services",
            Resource::Payments => "payments",
            Resource::Marketplace => "marketplace",
            Resource::Auth => "auth",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    Login,
    Register,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Login => "login",
            Operation::Register => "register",
        })
    }
}

pub type RecordId<C> = <<C as ResourceClient>::Record as Entity>::Id;

/// CRUD over one resource type.
///
/// `list` is the only required call; resources the backend does not let
/// you mutate keep the default bodies, which fail with
/// [`ApiError::Unsupported`]. Every call attaches the session credential
/// when one exists, and a 401/403 comes back as
/// `ApiError::Auth(AuthError::Unauthorized)`. Dropping the session in that
/// case is the caller's job.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    type Record: Entity + Searchable + Clone + Send + Sync + 'static;
    type Draft: Draft + 'static;

    fn resource(&self) -> Resource;

    async fn list(&self) -> ApiResult<Vec<Self::Record>>;

    async fn create(&self, _draft: &Self::Draft) -> ApiResult<Self::Record> {
        Err(self.unsupported(Operation::Create))
    }

    async fn update(
        &self,
        _id: <Self::Record as Entity>::Id,
        _draft: &Self::Draft,
    ) -> ApiResult<Self::Record> {
        Err(self.unsupported(Operation::Update))
    }

    async fn delete(&self, _id: <Self::Record as Entity>::Id) -> ApiResult<()> {
        Err(self.unsupported(Operation::Delete))
    }

    fn unsupported(&self, operation: Operation) -> ApiError {
        ApiError::Unsupported {
            resource: self.resource(),
            operation,
        }
    }
}
