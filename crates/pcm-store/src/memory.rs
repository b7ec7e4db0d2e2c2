use std::sync::RwLock;

use bson::{Bson, Document};
use pcm_service::{ProductRef, ProductStore, StoreError, TaxonomyStore};

use crate::matcher::matches;

/// In-memory store backing integration tests and the dev server. Three
/// collections mirror the production layout: products, the general taxonomy
/// tree, and the classification master tree.
pub struct MemoryStore {
    products: RwLock<Vec<Document>>,
    taxonomy: RwLock<Vec<Document>>,
    taxonomy_master: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            taxonomy: RwLock::new(Vec::new()),
            taxonomy_master: RwLock::new(Vec::new()),
        }
    }

    pub fn seed_products(&self, records: Vec<Document>) {
        self.products.write().expect("poisoned").extend(records);
    }

    pub fn seed_taxonomy(&self, records: Vec<Document>) {
        self.taxonomy.write().expect("poisoned").extend(records);
    }

    pub fn seed_taxonomy_master(&self, records: Vec<Document>) {
        self.taxonomy_master
            .write()
            .expect("poisoned")
            .extend(records);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore for MemoryStore {
    fn find_refs(&self, field: &str, value: &Bson) -> Result<Vec<ProductRef>, StoreError> {
        let mut filter = Document::new();
        filter.insert(field, value.clone());
        let products = self.products.read().map_err(poisoned)?;
        Ok(products
            .iter()
            .filter(|record| matches(&filter, record))
            .map(to_ref)
            .collect())
    }

    fn find(
        &self,
        filter: &Document,
        projection: &[String],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Document>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        let results = products
            .iter()
            .filter(|record| matches(filter, record))
            .skip(offset.unwrap_or(0) as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .map(|record| project(record, projection))
            .collect();
        Ok(results)
    }

    fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.iter().filter(|record| matches(filter, record)).count() as u64)
    }

    fn get(&self, id: &str, projection: &[String]) -> Result<Option<Document>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products
            .iter()
            .find(|record| record.get_str("_id") == Ok(id))
            .map(|record| project(record, projection)))
    }

    fn insert(&self, doc: Document) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        if let Ok(id) = doc.get_str("_id") {
            if products.iter().any(|record| record.get_str("_id") == Ok(id)) {
                return Err(StoreError(format!("duplicate key: {id}")));
            }
        }
        products.push(doc);
        Ok(())
    }

    fn replace(&self, id: &str, doc: Document) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        match products
            .iter_mut()
            .find(|record| record.get_str("_id") == Ok(id))
        {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl TaxonomyStore for MemoryStore {
    fn find_taxonomy(
        &self,
        filter: &Document,
        projection: &[String],
    ) -> Result<Vec<Document>, StoreError> {
        let records = self.taxonomy.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|record| matches(filter, record))
            .map(|record| project(record, projection))
            .collect())
    }

    fn find_taxonomy_master(
        &self,
        filter: &Document,
        projection: &[String],
    ) -> Result<Vec<Document>, StoreError> {
        let records = self.taxonomy_master.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|record| matches(filter, record))
            .map(|record| project(record, projection))
            .collect())
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError("lock poisoned".into())
}

fn to_ref(record: &Document) -> ProductRef {
    ProductRef {
        id: record.get_str("_id").unwrap_or_default().to_string(),
        product_type: record.get_str("type").unwrap_or_default().to_string(),
        sources: record
            .get_array("sources")
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Bson::String(s) => Some(s.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        format: record.get_str("format").ok().map(str::to_string),
        modified_at: record
            .get_datetime("modifiedAt")
            .copied()
            .unwrap_or_else(|_| bson::DateTime::from_millis(0)),
    }
}

/// Apply a dotted-path projection. An empty list means the whole record;
/// the primary key is always carried.
fn project(record: &Document, fields: &[String]) -> Document {
    if fields.is_empty() {
        return record.clone();
    }
    let mut out = Document::new();
    if let Some(id) = record.get("_id") {
        out.insert("_id", id.clone());
    }
    for field in fields {
        copy_path(record, &mut out, field);
    }
    out
}

fn copy_path(src: &Document, dst: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            if let Some(value) = src.get(path) {
                dst.insert(path, value.clone());
            }
        }
        Some((head, rest)) => {
            let Ok(sub) = src.get_document(head) else {
                return;
            };
            if !dst.contains_key(head) {
                dst.insert(head, Document::new());
            }
            if let Ok(nested) = dst.get_document_mut(head) {
                copy_path(sub, nested, rest);
            }
        }
    }
}
