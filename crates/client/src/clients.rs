use async_trait::async_trait;
use reqwest::Method;

use tallerpro_core::{ClientId, Draft};
use tallerpro_workshop::{Client, ClientDraft, Vehicle};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// `/clients`. The backend has no update or delete for clients.
#[derive(Debug, Clone)]
pub struct ClientsClient {
    transport: HttpTransport,
}

impl ClientsClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Vehicles registered to one client.
    pub async fn vehicles_of(&self, client_id: ClientId) -> ApiResult<Vec<Vehicle>> {
        decode(
            self.transport
                .get(&format!("/clients/{client_id}/vehicles"))
                .await?,
        )
    }
}

#[async_trait]
impl ResourceClient for ClientsClient {
    type Record = Client;
    type Draft = ClientDraft;

    fn resource(&self) -> Resource {
        Resource::Clients
    }

    async fn list(&self) -> ApiResult<Vec<Client>> {
        decode(self.transport.get("/clients").await?)
    }

    async fn create(&self, draft: &ClientDraft) -> ApiResult<Client> {
        draft.validate()?;
        let body = self
            .transport
            .send(Method::POST, "/clients", &draft.payload())
            .await?;
        unwrap_envelope(body, "client")
    }
}
