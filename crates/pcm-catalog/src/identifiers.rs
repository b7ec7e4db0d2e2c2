/// Attributes a rule group may use as lookup identifiers.
pub const IDENTIFIER_ATTRIBUTES: &[&str] = &["_id", "identifiers.isbn", "identifiers.doi"];

/// Cap on the total number of identifier values across all identifier
/// criteria in one request.
pub const MAX_IDENTIFIER_VALUES: usize = 100;

/// Map an external identifier name to its storage field path.
pub fn identifier_field(name: &str) -> Option<&'static str> {
    match name {
        "_id" => Some("_id"),
        "isbn" => Some("identifiers.isbn"),
        "doi" => Some("identifiers.doi"),
        "collectionId" => Some("identifiers.collectionId"),
        _ => None,
    }
}

pub fn is_identifier_attribute(attribute: &str) -> bool {
    IDENTIFIER_ATTRIBUTES.contains(&attribute)
}
