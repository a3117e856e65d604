use serde::{Deserialize, Serialize};

use tallerpro_core::{
    ClientId, DomainError, DomainResult, Draft, EditableDraft, Entity, VehicleId,
    require_non_empty,
};

use crate::search::Searchable;

/// A vehicle as listed by the backend.
///
/// `client_name` is only present on the flat `GET /vehicles` listing, where
/// the backend joins the owner's name in for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub client_id: ClientId,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
}

impl Entity for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Vehicle {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.plate.as_str(), self.brand.as_str(), self.model.as_str()];
        if let Some(owner) = &self.client_name {
            fields.push(owner);
        }
        fields
    }
}

/// Form state for creating or editing a vehicle.
///
/// `client_id` names the owner; creation is routed under that client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDraft {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub client_id: Option<ClientId>,
}

/// Create body; the owner travels in the URL, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehiclePayload {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: Option<String>,
}

/// Update body. `PUT /vehicles/:id` has no owner in the path, so a
/// reassignment is carried in `client_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleUpdate {
    #[serde(flatten)]
    pub fields: VehiclePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
}

impl VehicleDraft {
    pub fn payload(&self) -> VehiclePayload {
        VehiclePayload {
            plate: self.plate.trim().to_string(),
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            vin: crate::non_empty(&self.vin),
        }
    }

    pub fn update_payload(&self) -> VehicleUpdate {
        VehicleUpdate {
            fields: self.payload(),
            client_id: self.client_id,
        }
    }
}

impl Draft for VehicleDraft {
    fn blank() -> Self {
        Self {
            plate: String::new(),
            brand: String::new(),
            model: String::new(),
            year: crate::current_year(),
            vin: String::new(),
            client_id: None,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.client_id.is_none() {
            return Err(DomainError::MissingField("client_id"));
        }
        require_non_empty("plate", &self.plate)?;
        require_non_empty("brand", &self.brand)?;
        require_non_empty("model", &self.model)?;
        if self.year <= 0 {
            return Err(DomainError::MissingField("year"));
        }
        Ok(())
    }
}

impl EditableDraft for VehicleDraft {
    type Record = Vehicle;

    fn from_record(record: &Vehicle) -> Self {
        Self {
            plate: record.plate.clone(),
            brand: record.brand.clone(),
            model: record.model.clone(),
            year: record.year,
            vin: record.vin.clone().unwrap_or_default(),
            client_id: Some(record.client_id),
        }
    }
}
