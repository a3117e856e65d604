use async_trait::async_trait;

use tallerpro_workshop::Technician;

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode};
use crate::ApiResult;

/// Read-only technician roster (`GET /api/users/technicians`).
#[derive(Debug, Clone)]
pub struct TechniciansClient {
    transport: HttpTransport,
}

impl TechniciansClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceClient for TechniciansClient {
    type Record = Technician;
    type Draft = ();

    fn resource(&self) -> Resource {
        Resource::Technicians
    }

    async fn list(&self) -> ApiResult<Vec<Technician>> {
        decode(self.transport.get("/api/users/technicians").await?)
    }
}
