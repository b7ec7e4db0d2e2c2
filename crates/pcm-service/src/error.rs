use std::fmt;

use pcm_catalog::CatalogError;
use pcm_query::ValidationError;

use crate::publisher::PublishError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Catalog(CatalogError),
    NotFound(String),
    Conflict(String),
    Store(StoreError),
    Publish(PublishError),
    Serialization(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::Catalog(e) => write!(f, "{e}"),
            Self::NotFound(msg) => write!(f, "{msg}"),
            Self::Conflict(msg) => write!(f, "{msg}"),
            Self::Store(e) => write!(f, "storage error: {e}"),
            Self::Publish(e) => write!(f, "publish error: {e}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Catalog(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Publish(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::Validation(_) | Self::Catalog(_) => http::StatusCode::BAD_REQUEST,
            Self::NotFound(_) => http::StatusCode::NOT_FOUND,
            Self::Conflict(_) => http::StatusCode::CONFLICT,
            Self::Publish(_) => http::StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Serialization(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured detail list for validation failures, empty otherwise.
    pub fn validation_messages(&self) -> &[pcm_query::ValidationMessage] {
        match self {
            Self::Validation(e) => &e.messages,
            _ => &[],
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<CatalogError> for ServiceError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<PublishError> for ServiceError {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}
