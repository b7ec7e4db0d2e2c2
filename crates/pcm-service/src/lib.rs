mod config;
mod error;
mod product;
mod publisher;
mod resolver;
mod store;
mod taxonomy;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use product::{DownloadReceipt, ProductService, SearchResponse};
pub use publisher::{EventEnvelope, EventPublisher, PublishError};
pub use resolver::{EditionResolver, IdentifierResolver, PreferredFormatResolver, Resolution};
pub use store::{ProductRef, ProductStore, StoreError, TaxonomyStore};
pub use taxonomy::{
    TaxonomyMasterQuery, TaxonomyNode, TaxonomyQuery, TaxonomyService, build_taxonomy_filter,
    build_taxonomy_master_filter, ubx_query,
};
