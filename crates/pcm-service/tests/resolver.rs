use std::sync::{Arc, Mutex};

use bson::{Bson, doc};
use pcm_catalog::ProductType;
use pcm_service::{
    EditionResolver, IdentifierResolver, ProductRef, Resolution, ServiceError,
};
use pcm_store::MemoryStore;

fn isbn(value: &str) -> Bson {
    Bson::String(value.to_string())
}

fn book(id: &str, isbn: &str, format: Option<&str>, millis: i64) -> bson::Document {
    let mut record = doc! {
        "_id": id,
        "type": "book",
        "identifiers": { "isbn": isbn },
        "modifiedAt": bson::DateTime::from_millis(millis),
    };
    if let Some(format) = format {
        record.insert("format", format);
    }
    record
}

fn chapter(id: &str, doi: &str, sources: Vec<&str>, millis: i64) -> bson::Document {
    doc! {
        "_id": id,
        "type": "chapter",
        "identifiers": { "doi": doi },
        "sources": sources.into_iter().map(Bson::from).collect::<Vec<Bson>>(),
        "modifiedAt": bson::DateTime::from_millis(millis),
    }
}

// ── zero / one match ────────────────────────────────────────────────

#[test]
fn zero_matches_is_the_null_sentinel() {
    let store = Arc::new(MemoryStore::new());
    let resolver = IdentifierResolver::new(store);
    let resolution = resolver.resolve("isbn", &isbn("missing")).unwrap();
    assert_eq!(resolution, Resolution::none());
}

#[test]
fn single_match_returned_directly() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![book("b-1", "9781", None, 0)]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("isbn", &isbn("9781")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("b-1"));
    assert_eq!(resolution.product_type, Some(ProductType::Book));
}

#[test]
fn unknown_identifier_name_rejected() {
    let store = Arc::new(MemoryStore::new());
    let resolver = IdentifierResolver::new(store);
    let err = resolver.resolve("sku", &isbn("x")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

// ── book precedence ─────────────────────────────────────────────────

#[test]
fn book_wins_over_chapter() {
    // a mixed {book, chapter} match always resolves to the book
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        book("b-1", "9781", None, 0),
        doc! {
            "_id": "c-1",
            "type": "chapter",
            "identifiers": { "isbn": "9781" },
            "modifiedAt": bson::DateTime::from_millis(999_999),
        },
    ]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("isbn", &isbn("9781")).unwrap();
    assert_eq!(resolution.product_type, Some(ProductType::Book));
    assert_eq!(resolution.id.as_deref(), Some("b-1"));
}

#[test]
fn default_edition_policy_prefers_electronic_format() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        book("b-print", "9781", Some("HARDCOVER"), 500),
        book("b-epub", "9781", Some("EPUB"), 100),
    ]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("isbn", &isbn("9781")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("b-epub"));
}

/// Records every candidate set it is asked about.
struct RecordingEditions {
    calls: Mutex<Vec<Vec<String>>>,
}

impl EditionResolver for RecordingEditions {
    fn resolve_edition(
        &self,
        candidates: &[ProductRef],
        _product_type: ProductType,
    ) -> Result<String, ServiceError> {
        let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
        self.calls.lock().unwrap().push(ids.clone());
        Ok(ids.last().cloned().unwrap_or_default())
    }
}

#[test]
fn delegates_all_book_candidates_to_edition_resolver() {
    // three books sharing an isbn: the whole set goes to the policy
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        book("b-1", "X", None, 1),
        book("b-2", "X", None, 2),
        book("b-3", "X", None, 3),
    ]);
    let editions = RecordingEditions {
        calls: Mutex::new(Vec::new()),
    };
    let resolver = IdentifierResolver::with_editions(store, editions);

    let resolution = resolver.resolve("isbn", &isbn("X")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("b-3"));
    assert_eq!(resolution.product_type, Some(ProductType::Book));
}

// ── chapter precedence ──────────────────────────────────────────────

#[test]
fn cms_sourced_chapter_wins_regardless_of_date() {
    // the CMS-sourced chapter wins even when another is newer
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        chapter("c-old-cms", "10.1/x", vec!["CMS"], 100),
        chapter("c-new", "10.1/x", vec!["FEED"], 900),
    ]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("doi", &isbn("10.1/x")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("c-old-cms"));
    assert_eq!(resolution.product_type, Some(ProductType::Chapter));
}

#[test]
fn without_cms_newest_chapter_wins() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        chapter("c-1", "10.1/x", vec!["FEED"], 100),
        chapter("c-2", "10.1/x", vec!["FEED"], 900),
    ]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("doi", &isbn("10.1/x")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("c-2"));
}

#[test]
fn newest_cms_chapter_wins_among_several() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        chapter("c-1", "10.1/x", vec!["CMS"], 100),
        chapter("c-2", "10.1/x", vec!["CMS"], 900),
        chapter("c-3", "10.1/x", vec!["FEED"], 9_000),
    ]);
    let resolver = IdentifierResolver::new(store);

    let resolution = resolver.resolve("doi", &isbn("10.1/x")).unwrap();
    assert_eq!(resolution.id.as_deref(), Some("c-2"));
}

// ── conflicts ───────────────────────────────────────────────────────

#[test]
fn same_type_ambiguity_is_a_conflict() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        doc! { "_id": "j-1", "type": "journal", "identifiers": { "doi": "10.2/y" } },
        doc! { "_id": "j-2", "type": "journal", "identifiers": { "doi": "10.2/y" } },
    ]);
    let resolver = IdentifierResolver::new(store);

    let err = resolver.resolve("doi", &isbn("10.2/y")).unwrap_err();
    match &err {
        ServiceError::Conflict(msg) => {
            assert!(msg.contains("associated with more than one product"), "{msg}")
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert_eq!(err.status_code(), http::StatusCode::CONFLICT);
}

#[test]
fn mixed_type_ambiguity_is_a_distinct_conflict() {
    let store = Arc::new(MemoryStore::new());
    store.seed_products(vec![
        doc! { "_id": "j-1", "type": "journal", "identifiers": { "doi": "10.2/y" } },
        doc! { "_id": "col-1", "type": "collection", "identifiers": { "doi": "10.2/y" } },
    ]);
    let resolver = IdentifierResolver::new(store);

    let err = resolver.resolve("doi", &isbn("10.2/y")).unwrap_err();
    match &err {
        ServiceError::Conflict(msg) => {
            assert!(msg.contains("associated with multiple product types"), "{msg}")
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}
