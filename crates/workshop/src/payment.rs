use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tallerpro_core::{DomainError, DomainResult, Draft, Entity, OrderId, PaymentId, require_non_empty};

use crate::search::Searchable;

/// Settlement state of a payment. Only `pagado` counts towards revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "pagado")]
    Paid,
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(untagged)]
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "pagado",
            PaymentStatus::Pending => "pendiente",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

/// A payment recorded against a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub work_order_id: OrderId,
    pub amount: f64,
    pub payment_method: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Entity for Payment {
    type Id = PaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.payment_method.as_str(), self.status.as_str()]
    }
}

/// Form state for registering a payment. New payments default to paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    pub work_order_id: Option<OrderId>,
    pub amount: String,
    pub payment_method: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPayload {
    pub work_order_id: OrderId,
    pub amount: f64,
    pub payment_method: String,
    pub status: PaymentStatus,
}

impl PaymentDraft {
    pub fn payload(&self) -> DomainResult<PaymentPayload> {
        let work_order_id = self
            .work_order_id
            .ok_or(DomainError::MissingField("work_order_id"))?;
        Ok(PaymentPayload {
            work_order_id,
            amount: crate::parse_amount("amount", &self.amount)?,
            payment_method: self.payment_method.trim().to_string(),
            status: self.status.clone(),
        })
    }
}

impl Draft for PaymentDraft {
    fn blank() -> Self {
        Self {
            work_order_id: None,
            amount: String::new(),
            payment_method: String::new(),
            status: PaymentStatus::Paid,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.work_order_id.is_none() {
            return Err(DomainError::MissingField("work_order_id"));
        }
        require_non_empty("amount", &self.amount)?;
        require_non_empty("payment_method", &self.payment_method)?;
        crate::parse_amount("amount", &self.amount).map(|_| ())
    }
}

/// `GET /api/payments/revenue`: paid totals, overall and per method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    #[serde(default)]
    pub by_method: BTreeMap<String, f64>,
}
