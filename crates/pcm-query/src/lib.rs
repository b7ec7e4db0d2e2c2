mod builder;
mod download;
mod error;
mod request;
mod token;
mod validate;

pub use builder::{ParsedQuery, QualifiedIdentifier, build_query, expand_attributes, qualified_identifier};
pub use download::validate_download_request;
pub use error::{ValidationError, ValidationMessage};
pub use request::{Availability, DownloadRequest, Recipients, SearchRequest, ValidateRequest};
pub use token::{Criteria, Marker, MarkerValue, Relationship, RuleGroup, RulePayload, RuleToken, TokenKind};
pub use validate::{validate_rules_request, validate_search_request};
