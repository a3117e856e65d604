use serde::{Deserialize, Serialize};

use tallerpro_core::{DomainResult, Draft, Entity, ServiceId, require_non_empty};

use crate::search::Searchable;

/// An entry of the workshop's service catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: f64,
}

impl Entity for Service {
    type Id = ServiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

/// Form state for adding a catalog entry. `base_price` stays text until
/// submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub base_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePayload {
    pub name: String,
    pub description: String,
    pub base_price: f64,
}

impl ServiceDraft {
    pub fn payload(&self) -> DomainResult<ServicePayload> {
        Ok(ServicePayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            base_price: crate::parse_amount("base_price", &self.base_price)?,
        })
    }
}

impl Draft for ServiceDraft {
    fn blank() -> Self {
        Self::default()
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("base_price", &self.base_price)?;
        crate::parse_amount("base_price", &self.base_price).map(|_| ())
    }
}
