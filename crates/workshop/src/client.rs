use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tallerpro_core::{ClientId, DomainResult, Draft, EditableDraft, Entity, require_non_empty};

use crate::search::Searchable;

/// A workshop client (vehicle owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.first_name.as_str(), self.last_name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ClientDraft {
    pub fn payload(&self) -> ClientPayload {
        ClientPayload {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: crate::non_empty(&self.email),
            phone: crate::non_empty(&self.phone),
            address: crate::non_empty(&self.address),
        }
    }
}

impl Draft for ClientDraft {
    fn blank() -> Self {
        Self::default()
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("first_name", &self.first_name)?;
        require_non_empty("last_name", &self.last_name)
    }
}

impl EditableDraft for ClientDraft {
    type Record = Client;

    fn from_record(record: &Client) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallerpro_core::DomainError;

    #[test]
    fn first_and_last_name_are_required() {
        let mut draft = ClientDraft::blank();
        assert_eq!(draft.validate(), Err(DomainError::MissingField("first_name")));
        draft.first_name = "Ana".into();
        assert_eq!(draft.validate(), Err(DomainError::MissingField("last_name")));
        draft.last_name = "Perez".into();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn optional_contact_fields_are_sent_as_null_when_blank() {
        let draft = ClientDraft {
            first_name: "Ana".into(),
            last_name: "Perez".into(),
            phone: " 555-1234 ".into(),
            ..ClientDraft::blank()
        };
        let payload = draft.payload();
        assert_eq!(payload.email, None);
        assert_eq!(payload.phone.as_deref(), Some("555-1234"));
    }

    #[test]
    fn decodes_backend_timestamp_without_offset() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": 1,
            "first_name": "Ana",
            "last_name": "Perez",
            "email": null,
            "phone": null,
            "address": null,
            "created_at": "2024-05-01T10:15:30.123456"
        }))
        .unwrap();
        assert!(client.created_at.is_some());
        assert_eq!(client.full_name(), "Ana Perez");
    }
}
