use std::fmt;

use crate::product_type::{ProductType, ResponseGroup};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A (product type, response group) pair with no configured projection.
    /// This is a hard configuration error — an empty projection would be
    /// indistinguishable from "no fields requested".
    UnmappedResponseGroup {
        product_type: ProductType,
        group: ResponseGroup,
    },
    UnknownProductType(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedResponseGroup {
                product_type,
                group,
            } => write!(
                f,
                "no response group {group} configured for product type {product_type}"
            ),
            Self::UnknownProductType(t) => write!(f, "unknown product type: {t}"),
        }
    }
}

impl std::error::Error for CatalogError {}
