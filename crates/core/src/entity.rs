//! Entity trait: identity assigned by the backend.

/// A record the backend owns and identifies.
///
/// The id doubles as the display key when a collection is rendered.
pub trait Entity {
    /// Strongly-typed record identifier.
    type Id: Copy
        + Eq
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + Send
        + Sync
        + 'static;

    /// Returns the record identifier.
    fn id(&self) -> &Self::Id;
}
