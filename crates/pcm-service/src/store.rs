use std::fmt;

use bson::{Bson, Document};

/// Failure from the storage collaborator. The core does not distinguish
/// transient from permanent failures; retry policy belongs to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StoreError {}

/// Slim view of a stored product, enough for identifier resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub id: String,
    pub product_type: String,
    /// Provenance systems this record was ingested from (e.g. "CMS").
    pub sources: Vec<String>,
    /// Media format of the record, when it carries one (e.g. "EPUB").
    pub format: Option<String>,
    pub modified_at: bson::DateTime,
}

/// Storage seam for product records. The service layer only ever hands the
/// store a predicate document in the dialect the query builder emits plus a
/// dotted-path projection list; it never executes queries itself.
pub trait ProductStore: Send + Sync {
    /// All records whose `field` equals `value` (array fields match on
    /// containment, as the underlying document store does).
    fn find_refs(&self, field: &str, value: &Bson) -> Result<Vec<ProductRef>, StoreError>;

    fn find(
        &self,
        filter: &Document,
        projection: &[String],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Document>, StoreError>;

    fn count(&self, filter: &Document) -> Result<u64, StoreError>;

    fn get(&self, id: &str, projection: &[String]) -> Result<Option<Document>, StoreError>;

    fn insert(&self, doc: Document) -> Result<(), StoreError>;

    /// Replace the record with primary key `id`; false when absent.
    fn replace(&self, id: &str, doc: Document) -> Result<bool, StoreError>;
}

/// Storage seam for the two taxonomy trees. The general tree and the
/// classification master tree are distinct collections with distinct
/// filter semantics; routing between them happens above this trait.
pub trait TaxonomyStore: Send + Sync {
    fn find_taxonomy(
        &self,
        filter: &Document,
        projection: &[String],
    ) -> Result<Vec<Document>, StoreError>;

    fn find_taxonomy_master(
        &self,
        filter: &Document,
        projection: &[String],
    ) -> Result<Vec<Document>, StoreError>;
}
