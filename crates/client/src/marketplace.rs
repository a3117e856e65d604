use async_trait::async_trait;
use reqwest::Method;

use tallerpro_core::{Draft, ListingId};
use tallerpro_workshop::{Listing, ListingDraft};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// Public car marketplace under `/api/marketplace`. Listing is anonymous; publishing and deleting
/// need a signed-in seller, and only the owner may delete.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    transport: HttpTransport,
}

impl MarketplaceClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Listings published by the signed-in user.
    pub async fn mine(&self) -> ApiResult<Vec<Listing>> {
        decode(self.transport.get("/api/marketplace/my-listings").await?)
    }
}

#[async_trait]
impl ResourceClient for MarketplaceClient {
    type Record = Listing;
    type Draft = ListingDraft;

    fn resource(&self) -> Resource {
        Resource::Marketplace
    }

    async fn list(&self) -> ApiResult<Vec<Listing>> {
        decode(self.transport.get("/api/marketplace/").await?)
    }

    async fn create(&self, draft: &ListingDraft) -> ApiResult<Listing> {
        draft.validate()?;
        let payload = draft.payload()?;
        let body = self
            .transport
            .send(Method::POST, "/api/marketplace/", &payload)
            .await?;
        unwrap_envelope(body, "listing")
    }

    async fn delete(&self, id: ListingId) -> ApiResult<()> {
        self.transport.delete(&format!("/api/marketplace/{id}")).await
    }
}
