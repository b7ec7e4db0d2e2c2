use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of product types the catalog serves.
///
/// Per-type projection tables and identifier policies are keyed by this tag;
/// adding a product type means extending this enum and the projection config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductType {
    Book,
    Chapter,
    Journal,
    Article,
    Collection,
    Series,
}

impl ProductType {
    pub const ALL: [ProductType; 6] = [
        ProductType::Book,
        ProductType::Chapter,
        ProductType::Journal,
        ProductType::Article,
        ProductType::Collection,
        ProductType::Series,
    ];

    pub fn parse(s: &str) -> Option<ProductType> {
        match s {
            "book" => Some(ProductType::Book),
            "chapter" => Some(ProductType::Chapter),
            "journal" => Some(ProductType::Journal),
            "article" => Some(ProductType::Article),
            "collection" => Some(ProductType::Collection),
            "series" => Some(ProductType::Series),
            _ => None,
        }
    }

    /// The wire name, which is also the key of the type's metadata block in
    /// a product document (a book's detail payload lives under `book`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Book => "book",
            ProductType::Chapter => "chapter",
            ProductType::Journal => "journal",
            ProductType::Article => "article",
            ProductType::Collection => "collection",
            ProductType::Series => "series",
        }
    }

    /// Part-type products live inside a parent product and carry the
    /// part response groups in addition to the common ones.
    pub fn is_part(&self) -> bool {
        matches!(self, ProductType::Chapter | ProductType::Article)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named detail level controlling which fields of a product are
/// returned and fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseGroup {
    Small,
    Medium,
    Large,
    PartSmall,
    PartMedium,
    AllProductsSmall,
    AllProductsMedium,
}

impl ResponseGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseGroup::Small => "small",
            ResponseGroup::Medium => "medium",
            ResponseGroup::Large => "large",
            ResponseGroup::PartSmall => "partSmall",
            ResponseGroup::PartMedium => "partMedium",
            ResponseGroup::AllProductsSmall => "allProductsSmall",
            ResponseGroup::AllProductsMedium => "allProductsMedium",
        }
    }
}

impl fmt::Display for ResponseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
