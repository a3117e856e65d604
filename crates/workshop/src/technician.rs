use serde::{Deserialize, Serialize};

use tallerpro_core::{Entity, UserId};

use crate::search::Searchable;

/// Availability shown on the technician roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechnicianStatus {
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Ocupado")]
    Busy,
    #[serde(rename = "Ausente")]
    Absent,
    #[serde(untagged)]
    Other(String),
}

/// A technician profile as returned by `GET /users/technicians`.
///
/// Everything besides the identity fields is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: UserId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub status: Option<TechnicianStatus>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub jobs_month: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl Technician {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Roster facet: `None` keeps everyone, otherwise an exact status match.
    pub fn has_status(&self, wanted: Option<&TechnicianStatus>) -> bool {
        match wanted {
            None => true,
            Some(status) => self.status.as_ref() == Some(status),
        }
    }
}

impl Entity for Technician {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Technician {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.first_name.as_str(), self.last_name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.specialties.iter().map(String::as_str));
        fields
    }
}
