use std::collections::HashMap;

use crate::error::CatalogError;
use crate::product_type::{ProductType, ResponseGroup};

/// Fields shared by every product at the `small` detail level.
const PRODUCT_SMALL: &[&str] = &["_id", "type", "version", "identifiers", "title", "status"];

/// Added on top of `small` for the `medium` level.
const PRODUCT_MEDIUM_EXTRA: &[&str] = &[
    "subtitle",
    "contributors",
    "imprint",
    "publicationDate",
    "copyright",
    "language",
];

/// Added on top of `medium` for the `large` level. Every product type's
/// `large` group is this list plus the type's own metadata block.
const PRODUCT_LARGE_EXTRA: &[&str] = &[
    "description",
    "audience",
    "subjects",
    "rights",
    "prices",
    "availability",
    "relatedProducts",
    "source",
    "dates",
];

/// Part context for products that live inside a parent (chapter, article).
const PART_EXTRA: &[&str] = &["partNumber", "parentId", "pageRange"];

/// Cross-type listing shapes.
const ALL_PRODUCTS_SMALL: &[&str] = &["_id", "type", "identifiers", "title"];
const ALL_PRODUCTS_MEDIUM_EXTRA: &[&str] = &["status", "publicationDate", "imprint"];

const TAXONOMY_FIELDS: &[&str] = &[
    "_id",
    "type",
    "assetType",
    "code",
    "level",
    "name",
    "parentId",
    "status",
];

const TAXONOMY_MASTER_FIELDS: &[&str] = &[
    "_id",
    "classificationFamily",
    "classificationType",
    "code",
    "level",
    "name",
    "parentId",
    "status",
];

/// Static projection tables keyed by (product type, response group).
///
/// Built once at process start and read concurrently afterwards; the table
/// is never mutated post-construction.
pub struct ProjectionConfig {
    table: HashMap<(ProductType, ResponseGroup), Vec<String>>,
    all_products_small: Vec<String>,
    taxonomy: Vec<String>,
    taxonomy_master: Vec<String>,
}

impl ProjectionConfig {
    pub fn new() -> Self {
        let small = to_owned(PRODUCT_SMALL);
        let medium = concat(&small, PRODUCT_MEDIUM_EXTRA);
        let large = concat(&medium, PRODUCT_LARGE_EXTRA);
        let all_small = to_owned(ALL_PRODUCTS_SMALL);
        let all_medium = concat(&all_small, ALL_PRODUCTS_MEDIUM_EXTRA);

        let mut table = HashMap::new();
        for product_type in ProductType::ALL {
            table.insert((product_type, ResponseGroup::Small), small.clone());
            table.insert((product_type, ResponseGroup::Medium), medium.clone());

            // large = productLarge + the type's own metadata block
            let mut type_large = large.clone();
            type_large.push(product_type.as_str().to_string());
            table.insert((product_type, ResponseGroup::Large), type_large);

            if product_type.is_part() {
                table.insert(
                    (product_type, ResponseGroup::PartSmall),
                    concat(&small, PART_EXTRA),
                );
                table.insert(
                    (product_type, ResponseGroup::PartMedium),
                    concat(&medium, PART_EXTRA),
                );
            }

            table.insert(
                (product_type, ResponseGroup::AllProductsSmall),
                all_small.clone(),
            );
            table.insert(
                (product_type, ResponseGroup::AllProductsMedium),
                all_medium.clone(),
            );
        }

        Self {
            table,
            all_products_small: all_small,
            taxonomy: to_owned(TAXONOMY_FIELDS),
            taxonomy_master: to_owned(TAXONOMY_MASTER_FIELDS),
        }
    }

    /// Projection field list for a (product type, response group) pair.
    ///
    /// An unconfigured pair is an error, never an empty list.
    pub fn fields(
        &self,
        product_type: ProductType,
        group: ResponseGroup,
    ) -> Result<&[String], CatalogError> {
        self.table
            .get(&(product_type, group))
            .map(Vec::as_slice)
            .ok_or(CatalogError::UnmappedResponseGroup {
                product_type,
                group,
            })
    }

    /// Cross-type listing shape, identical for every product type.
    pub fn all_products_small_fields(&self) -> &[String] {
        &self.all_products_small
    }

    pub fn taxonomy_fields(&self) -> &[String] {
        &self.taxonomy
    }

    pub fn taxonomy_master_fields(&self) -> &[String] {
        &self.taxonomy_master
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn to_owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn concat(base: &[String], extra: &[&str]) -> Vec<String> {
    let mut out = base.to_vec();
    out.extend(extra.iter().map(|f| f.to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_is_subset_of_medium_is_subset_of_large() {
        let config = ProjectionConfig::new();
        let small = config
            .fields(ProductType::Book, ResponseGroup::Small)
            .unwrap();
        let medium = config
            .fields(ProductType::Book, ResponseGroup::Medium)
            .unwrap();
        let large = config
            .fields(ProductType::Book, ResponseGroup::Large)
            .unwrap();

        assert!(small.iter().all(|f| medium.contains(f)));
        assert!(medium.iter().all(|f| large.contains(f)));
    }

    #[test]
    fn large_appends_type_metadata_block() {
        let config = ProjectionConfig::new();

        let book = config
            .fields(ProductType::Book, ResponseGroup::Large)
            .unwrap();
        assert_eq!(book.last().map(String::as_str), Some("book"));

        // chapter large = the shared large fields plus "chapter"
        let chapter = config
            .fields(ProductType::Chapter, ResponseGroup::Large)
            .unwrap();
        assert_eq!(chapter.last().map(String::as_str), Some("chapter"));
        assert_eq!(&book[..book.len() - 1], &chapter[..chapter.len() - 1]);
    }

    #[test]
    fn lookup_is_deterministic() {
        let config = ProjectionConfig::new();
        let first = config
            .fields(ProductType::Book, ResponseGroup::Large)
            .unwrap()
            .to_vec();
        let second = config
            .fields(ProductType::Book, ResponseGroup::Large)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unconfigured_pair_is_an_error() {
        let config = ProjectionConfig::new();
        // part groups exist only for part-type products
        let err = config
            .fields(ProductType::Book, ResponseGroup::PartSmall)
            .unwrap_err();
        match err {
            CatalogError::UnmappedResponseGroup {
                product_type,
                group,
            } => {
                assert_eq!(product_type, ProductType::Book);
                assert_eq!(group, ResponseGroup::PartSmall);
            }
            other => panic!("expected UnmappedResponseGroup, got {other:?}"),
        }
        // the error names both the type and the group
        let msg = err.to_string();
        assert!(msg.contains("book"), "{msg}");
        assert!(msg.contains("partSmall"), "{msg}");
    }

    #[test]
    fn part_groups_configured_for_parts() {
        let config = ProjectionConfig::new();
        let fields = config
            .fields(ProductType::Chapter, ResponseGroup::PartSmall)
            .unwrap();
        assert!(fields.iter().any(|f| f == "parentId"));
    }

    #[test]
    fn every_type_has_small_medium_large() {
        let config = ProjectionConfig::new();
        for product_type in ProductType::ALL {
            for group in [
                ResponseGroup::Small,
                ResponseGroup::Medium,
                ResponseGroup::Large,
            ] {
                assert!(
                    config.fields(product_type, group).is_ok(),
                    "{product_type}/{group} missing"
                );
            }
        }
    }
}
