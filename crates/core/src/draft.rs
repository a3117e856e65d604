//! Drafts: unsaved form state shaped like a create/update payload.

use crate::error::{DomainError, DomainResult};

/// In-progress edit state for one resource type.
pub trait Draft: Clone + Send + Sync {
    /// A fresh draft seeded with the resource's defaults.
    fn blank() -> Self;

    /// Checks required fields. Runs before any request is issued.
    fn validate(&self) -> DomainResult<()>;
}

/// A draft that can be seeded from an existing record for editing.
pub trait EditableDraft: Draft {
    type Record;

    fn from_record(record: &Self::Record) -> Self;
}

/// Read-only resources have nothing to edit.
impl Draft for () {
    fn blank() -> Self {}

    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Fails with `MissingField` when `value` is empty or whitespace.
pub fn require_non_empty(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::MissingField(field))
    } else {
        Ok(())
    }
}
