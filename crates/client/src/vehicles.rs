use async_trait::async_trait;
use reqwest::Method;

use tallerpro_core::{DomainError, Draft, VehicleId};
use tallerpro_workshop::{Vehicle, VehicleDraft};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// `/vehicles`, with creation routed under the owning client.
#[derive(Debug, Clone)]
pub struct VehiclesClient {
    transport: HttpTransport,
}

impl VehiclesClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceClient for VehiclesClient {
    type Record = Vehicle;
    type Draft = VehicleDraft;

    fn resource(&self) -> Resource {
        Resource::Vehicles
    }

    async fn list(&self) -> ApiResult<Vec<Vehicle>> {
        decode(self.transport.get("/vehicles").await?)
    }

    /// `POST /clients/:client_id/vehicles`. The owner travels in the path;
    /// the returned record has the same flat shape as a listed one.
    async fn create(&self, draft: &VehicleDraft) -> ApiResult<Vehicle> {
        draft.validate()?;
        let client_id = draft
            .client_id
            .ok_or(DomainError::MissingField("client_id"))?;

        let body = self
            .transport
            .send(
                Method::POST,
                &format!("/clients/{client_id}/vehicles"),
                &draft.payload(),
            )
            .await?;
        unwrap_envelope(body, "vehicle")
    }

    /// `PUT /vehicles/:id`. Unlike create, the owner rides in the body so an
    /// edit can move the vehicle to another client.
    async fn update(&self, id: VehicleId, draft: &VehicleDraft) -> ApiResult<Vehicle> {
        draft.validate()?;
        let body = self
            .transport
            .send(Method::PUT, &format!("/vehicles/{id}"), &draft.update_payload())
            .await?;
        unwrap_envelope(body, "vehicle")
    }

    async fn delete(&self, id: VehicleId) -> ApiResult<()> {
        self.transport.delete(&format!("/vehicles/{id}")).await
    }
}
