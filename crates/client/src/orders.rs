use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use tallerpro_core::{DomainError, Draft, OrderId, ServiceId};
use tallerpro_workshop::{ItemAdded, OrderDraft, OrderStatus, WorkOrder};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// Work orders.
///
/// `GET /orders` is not served by every backend build; a 404 there means
/// the list is unavailable, not that something broke.
#[derive(Debug, Clone)]
pub struct OrdersClient {
    transport: HttpTransport,
}

impl OrdersClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn get(&self, id: OrderId) -> ApiResult<WorkOrder> {
        decode(self.transport.get(&format!("/orders/{id}")).await?)
    }

    /// `PUT /orders/:id/status`. The backend answers `{msg, status}`.
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> ApiResult<OrderStatus> {
        let body = self
            .transport
            .send(
                Method::PUT,
                &format!("/orders/{id}/status"),
                &json!({ "status": status }),
            )
            .await?;
        unwrap_envelope(body, "status")
    }

    /// `POST /orders/:id/items`. The backend prices the line from the
    /// catalog and answers with the line plus the order's new total.
    pub async fn add_item(&self, id: OrderId, service_id: ServiceId) -> ApiResult<ItemAdded> {
        let body = self
            .transport
            .send(
                Method::POST,
                &format!("/orders/{id}/items"),
                &json!({ "service_id": service_id }),
            )
            .await?;
        decode(body)
    }
}

#[async_trait]
impl ResourceClient for OrdersClient {
    type Record = WorkOrder;
    type Draft = OrderDraft;

    fn resource(&self) -> Resource {
        Resource::Orders
    }

    async fn list(&self) -> ApiResult<Vec<WorkOrder>> {
        decode(self.transport.get("/orders").await?)
    }

    async fn create(&self, draft: &OrderDraft) -> ApiResult<WorkOrder> {
        draft.validate()?;
        let vehicle_id = draft
            .vehicle_id
            .ok_or(DomainError::MissingField("vehicle_id"))?;
        let body = self
            .transport
            .send(Method::POST, "/orders", &json!({ "vehicle_id": vehicle_id }))
            .await?;
        unwrap_envelope(body, "order")
    }
}
