use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tallerpro_core::{
    DomainError, DomainResult, Draft, Entity, OrderId, ServiceId, UserId, VehicleId,
};

use crate::search::Searchable;

/// Work order lifecycle as the backend names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "finalizado")]
    Finished,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendiente",
            OrderStatus::InProgress => "en_progreso",
            OrderStatus::Finished => "finalizado",
            OrderStatus::Delivered => "entregado",
            OrderStatus::Cancelled => "cancelado",
        }
    }
}

/// A line on a work order. The price is frozen when the line is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub work_order_id: OrderId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub service_name: Option<String>,
    pub price_at_moment: f64,
}

/// Answer to `POST /orders/:id/items`: the new line and the order's new total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: OrderItem,
    pub order_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: OrderId,
    pub vehicle_id: VehicleId,
    pub user_id: UserId,
    pub status: OrderStatus,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub vehicle_plate: Option<String>,
}

impl WorkOrder {
    /// Label for the vehicle column; falls back to the raw id.
    pub fn vehicle_label(&self) -> String {
        match &self.vehicle_plate {
            Some(plate) => plate.clone(),
            None => format!("Vehicle {}", self.vehicle_id),
        }
    }
}

impl Entity for WorkOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for WorkOrder {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.status.as_str()];
        fields.extend(self.vehicle_plate.as_deref());
        fields
    }
}

/// Opening a work order only needs the vehicle. Orders are never edited
/// through a form; status changes and lines have their own calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub vehicle_id: Option<VehicleId>,
}

impl Draft for OrderDraft {
    fn blank() -> Self {
        Self::default()
    }

    fn validate(&self) -> DomainResult<()> {
        match self.vehicle_id {
            Some(_) => Ok(()),
            None => Err(DomainError::MissingField("vehicle_id")),
        }
    }
}
