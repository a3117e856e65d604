use async_trait::async_trait;
use reqwest::Method;

use tallerpro_core::Draft;
use tallerpro_workshop::{Service, ServiceDraft};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// The service catalog (`/services`). Listing is open; adding an entry is
/// admin-only, anyone else gets a 403.
#[derive(Debug, Clone)]
pub struct ServicesClient {
    transport: HttpTransport,
}

impl ServicesClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceClient for ServicesClient {
    type Record = Service;
    type Draft = ServiceDraft;

    fn resource(&self) -> Resource {
        Resource::Services
    }

    async fn list(&self) -> ApiResult<Vec<Service>> {
        decode(self.transport.get("/services").await?)
    }

    async fn create(&self, draft: &ServiceDraft) -> ApiResult<Service> {
        draft.validate()?;
        let payload = draft.payload()?;
        let body = self
            .transport
            .send(Method::POST, "/services", &payload)
            .await?;
        unwrap_envelope(body, "service")
    }
}
