use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tallerpro_core::{
    DomainResult, Draft, EditableDraft, Entity, ListingId, UserId, require_non_empty,
};

use crate::search::Searchable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
}

/// A car published on the public marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub user_id: UserId,
    #[serde(default)]
    pub seller_name: Option<String>,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: ListingStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Entity for Listing {
    type Id = ListingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Listing {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.brand.as_str(), self.model.as_str()];
        fields.extend(self.seller_name.as_deref());
        fields
    }
}

/// Form state for publishing a car. `price` stays text until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPayload {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub description: String,
    pub image_url: String,
}

impl ListingDraft {
    fn parsed_price(&self) -> DomainResult<f64> {
        crate::parse_amount("price", &self.price)
    }

    /// Builds the request body. Fails the same way `validate` does.
    pub fn payload(&self) -> DomainResult<ListingPayload> {
        Ok(ListingPayload {
            title: self.title.trim().to_string(),
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            price: self.parsed_price()?,
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

impl Draft for ListingDraft {
    fn blank() -> Self {
        Self {
            title: String::new(),
            brand: String::new(),
            model: String::new(),
            year: crate::current_year(),
            price: String::new(),
            description: String::new(),
            image_url: String::new(),
        }
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("title", &self.title)?;
        require_non_empty("price", &self.price)?;
        self.parsed_price().map(|_| ())
    }
}

impl EditableDraft for ListingDraft {
    type Record = Listing;

    fn from_record(record: &Listing) -> Self {
        Self {
            title: record.title.clone(),
            brand: record.brand.clone(),
            model: record.model.clone(),
            year: record.year,
            price: record.price.to_string(),
            description: record.description.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallerpro_core::DomainError;

    #[test]
    fn title_and_price_are_required() {
        let mut draft = ListingDraft::blank();
        assert_eq!(draft.validate(), Err(DomainError::MissingField("title")));
        draft.title = "Corolla 2018".into();
        assert_eq!(draft.validate(), Err(DomainError::MissingField("price")));
        draft.price = "abc".into();
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
        draft.price = "8500.50".into();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.payload().unwrap().price, 8500.50);
    }

    #[test]
    fn blank_listing_uses_current_year() {
        assert_eq!(ListingDraft::blank().year, crate::current_year());
    }
}
