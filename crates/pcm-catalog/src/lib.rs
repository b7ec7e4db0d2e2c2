mod error;
mod identifiers;
mod product_type;
mod projection;

pub use error::CatalogError;
pub use identifiers::{
    IDENTIFIER_ATTRIBUTES, MAX_IDENTIFIER_VALUES, identifier_field, is_identifier_attribute,
};
pub use product_type::{ProductType, ResponseGroup};
pub use projection::ProjectionConfig;
