//! `tallerpro-workshop`: the records a repair shop manages.
//!
//! Each module holds the record shape the backend returns, the draft a form
//! edits, and the display fields used for client-side search.

pub mod client;
pub mod listing;
pub mod order;
pub mod payment;
pub mod search;
pub mod service;
pub mod technician;
pub mod vehicle;

pub use client::{Client, ClientDraft, ClientPayload};
pub use listing::{Listing, ListingDraft, ListingPayload, ListingStatus};
pub use order::{ItemAdded, OrderDraft, OrderItem, OrderStatus, WorkOrder};
pub use payment::{Payment, PaymentDraft, PaymentPayload, PaymentStatus, RevenueSummary};
pub use search::{Searchable, matches_term};
pub use service::{Service, ServiceDraft, ServicePayload};
pub use technician::{Technician, TechnicianStatus};
pub use vehicle::{Vehicle, VehicleDraft, VehiclePayload, VehicleUpdate};

/// Current calendar year, used to seed drafts with a `year` field.
pub(crate) fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}

/// Money typed into a form: must parse and be strictly positive.
pub(crate) fn parse_amount(field: &str, raw: &str) -> tallerpro_core::DomainResult<f64> {
    use tallerpro_core::DomainError;

    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("{field} is not a number: {raw}")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::validation(format!("{field} must be greater than zero")));
    }
    Ok(amount)
}

/// Empty strings become `None` on the wire.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
