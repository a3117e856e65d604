//! Case-insensitive substring search over a record's display fields.

/// A record that can be matched by the list page search box.
pub trait Searchable {
    /// The fixed set of display fields a search term is matched against.
    /// Absent fields are simply skipped.
    fn search_fields(&self) -> Vec<&str>;
}

/// Whether `term` occurs (ignoring case) in at least one display field.
///
/// An empty term matches every record.
pub fn matches_term<T: Searchable + ?Sized>(record: &T, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
