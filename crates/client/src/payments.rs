use async_trait::async_trait;
use reqwest::Method;

use tallerpro_core::Draft;
use tallerpro_workshop::{Payment, PaymentDraft, RevenueSummary};

use crate::resource::{Resource, ResourceClient};
use crate::transport::{HttpTransport, decode, unwrap_envelope};
use crate::ApiResult;

/// Payments against work orders, mounted under `/api/payments`.
///
/// The list is the payment history, newest first as the backend orders it.
#[derive(Debug, Clone)]
pub struct PaymentsClient {
    transport: HttpTransport,
}

impl PaymentsClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Paid totals, overall and per payment method.
    pub async fn revenue(&self) -> ApiResult<RevenueSummary> {
        decode(self.transport.get("/api/payments/revenue").await?)
    }
}

#[async_trait]
impl ResourceClient for PaymentsClient {
    type Record = Payment;
    type Draft = PaymentDraft;

    fn resource(&self) -> Resource {
        Resource::Payments
    }

    async fn list(&self) -> ApiResult<Vec<Payment>> {
        decode(self.transport.get("/api/payments/history").await?)
    }

    async fn create(&self, draft: &PaymentDraft) -> ApiResult<Payment> {
        draft.validate()?;
        let payload = draft.payload()?;
        let body = self
            .transport
            .send(Method::POST, "/api/payments/", &payload)
            .await?;
        unwrap_envelope(body, "payment")
    }
}
