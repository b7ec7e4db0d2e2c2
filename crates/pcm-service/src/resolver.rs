use std::collections::BTreeSet;
use std::sync::Arc;

use bson::Bson;
use pcm_catalog::{ProductType, identifier_field};
use pcm_query::ValidationError;

use crate::error::ServiceError;
use crate::store::{ProductRef, ProductStore};

/// Outcome of resolving a non-unique external identifier. Zero matches is
/// the null sentinel, not an error — callers decide whether that is a 404.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub id: Option<String>,
    pub product_type: Option<ProductType>,
}

impl Resolution {
    pub fn none() -> Self {
        Self {
            id: None,
            product_type: None,
        }
    }

    fn of(record: &ProductRef) -> Self {
        Self {
            id: Some(record.id.clone()),
            product_type: ProductType::parse(&record.product_type),
        }
    }
}

/// Picks the canonical edition among several book records sharing an
/// identifier. A seam so the edition policy can evolve independently of
/// the resolution cascade.
pub trait EditionResolver: Send + Sync {
    fn resolve_edition(
        &self,
        candidates: &[ProductRef],
        product_type: ProductType,
    ) -> Result<String, ServiceError>;
}

const ELECTRONIC_FORMATS: &[&str] = &["EPUB", "PDF", "HTML"];

/// Default edition policy: prefer electronic formats, newest modification
/// wins within the preferred set.
pub struct PreferredFormatResolver;

impl EditionResolver for PreferredFormatResolver {
    fn resolve_edition(
        &self,
        candidates: &[ProductRef],
        _product_type: ProductType,
    ) -> Result<String, ServiceError> {
        let electronic: Vec<&ProductRef> = candidates
            .iter()
            .filter(|r| {
                r.format
                    .as_deref()
                    .is_some_and(|f| ELECTRONIC_FORMATS.contains(&f))
            })
            .collect();

        let pool: Vec<&ProductRef> = if electronic.is_empty() {
            candidates.iter().collect()
        } else {
            electronic
        };

        pool.iter()
            .max_by_key(|r| r.modified_at)
            .map(|r| r.id.clone())
            .ok_or_else(|| ServiceError::NotFound("no edition candidates".into()))
    }
}

/// Resolves an external identifier to the single canonical product record.
///
/// The tie-break cascade (book edition → chapter CMS preference → conflict)
/// encodes domain precedence and must be applied in order, short-circuiting.
pub struct IdentifierResolver<S, E = PreferredFormatResolver> {
    store: Arc<S>,
    editions: E,
}

impl<S: ProductStore> IdentifierResolver<S, PreferredFormatResolver> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            editions: PreferredFormatResolver,
        }
    }
}

impl<S: ProductStore, E: EditionResolver> IdentifierResolver<S, E> {
    pub fn with_editions(store: Arc<S>, editions: E) -> Self {
        Self { store, editions }
    }

    pub fn resolve(&self, identifier: &str, value: &Bson) -> Result<Resolution, ServiceError> {
        let field = identifier_field(identifier).ok_or_else(|| {
            ServiceError::Validation(ValidationError::single(
                "/identifier",
                format!("{identifier} is not a supported identifier"),
            ))
        })?;

        let matches = self.store.find_refs(field, value)?;
        match matches.as_slice() {
            [] => Ok(Resolution::none()),
            [only] => Ok(Resolution::of(only)),
            _ => self.resolve_ambiguous(identifier, value, matches),
        }
    }

    fn resolve_ambiguous(
        &self,
        identifier: &str,
        value: &Bson,
        matches: Vec<ProductRef>,
    ) -> Result<Resolution, ServiceError> {
        // Books take precedence: pick the canonical edition.
        let books: Vec<ProductRef> = matches
            .iter()
            .filter(|r| r.product_type == ProductType::Book.as_str())
            .cloned()
            .collect();
        if !books.is_empty() {
            let id = self.editions.resolve_edition(&books, ProductType::Book)?;
            return Ok(Resolution {
                id: Some(id),
                product_type: Some(ProductType::Book),
            });
        }

        // Chapters: prefer CMS-sourced records, newest modification wins.
        let chapters: Vec<ProductRef> = matches
            .iter()
            .filter(|r| r.product_type == ProductType::Chapter.as_str())
            .cloned()
            .collect();
        if !chapters.is_empty() {
            let cms: Vec<ProductRef> = chapters
                .iter()
                .filter(|r| r.sources.iter().any(|s| s == "CMS"))
                .cloned()
                .collect();
            let pool = if cms.is_empty() { chapters } else { cms };
            let chosen = pool
                .iter()
                .max_by_key(|r| r.modified_at)
                .ok_or_else(|| ServiceError::NotFound("no chapter candidates".into()))?;
            return Ok(Resolution::of(chosen));
        }

        // Other or mixed types: ambiguity is a conflict.
        let types: BTreeSet<&str> = matches.iter().map(|r| r.product_type.as_str()).collect();
        if types.len() == 1 {
            Err(ServiceError::Conflict(format!(
                "{identifier} {value} is associated with more than one product"
            )))
        } else {
            tracing::warn!(
                identifier,
                types = ?types,
                "identifier resolves across product types"
            );
            Err(ServiceError::Conflict(format!(
                "{identifier} {value} is associated with multiple product types"
            )))
        }
    }
}
