//! `tallerpro-core`: shared building blocks for the TallerPro console.
//!
//! This crate contains **pure** primitives (no HTTP, no storage): record
//! identifiers, the `Entity` trait, draft validation and the domain error.

pub mod draft;
pub mod entity;
pub mod error;
pub mod id;

pub use draft::{Draft, EditableDraft, require_non_empty};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ClientId, ListingId, OrderId, PaymentId, ServiceId, UserId, VehicleId};
