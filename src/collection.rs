/// Collection used when the caller does not name one.
pub const DEFAULT_COLLECTION: &str = "docs";

/// Resolve the target collection: the given name if non-empty, else the default.
pub fn collection_name(name: Option<&str>) -> &str {
    match name {
        Some(n) if !n.is_empty() => n,
        _ => DEFAULT_COLLECTION,
    }
}
