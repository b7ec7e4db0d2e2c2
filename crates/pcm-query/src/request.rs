use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::token::RuleGroup;

/// Availability filter. `name` is mandatory whenever the block is supplied;
/// `status` is only permitted on the search and download endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub name: Option<String>,
    pub status: Option<Vec<String>>,
}

/// Body of the synchronous validate endpoint. Undeclared top-level fields
/// land in `extra` and are rejected by name — this is how pagination/sort
/// fields (`limit`, `offset`, `sortBy`, ...) are kept off this endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub action: Option<String>,
    pub api_version: Option<String>,
    pub availability: Option<Availability>,
    pub rules_list: Option<Vec<RuleGroup>>,
    /// Kept loosely typed so "must be a boolean" is a validation message.
    pub has_counts: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Body of the search endpoint. Unlike validate, this shape carries
/// pagination and sorting and permits availability status filtering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub action: Option<String>,
    pub api_version: Option<String>,
    pub availability: Option<Availability>,
    pub rules_list: Option<Vec<RuleGroup>>,
    pub has_counts: Option<serde_json::Value>,
    pub has_total_prices: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipients {
    pub to: Option<Vec<String>>,
    pub cc: Option<Vec<String>>,
}

/// Body of the search-and-download endpoint: broad result sets delivered
/// by email, so recipients and a file name are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub action: Option<String>,
    pub api_version: Option<String>,
    pub recipients: Option<Recipients>,
    pub file_name: Option<String>,
    pub availability: Option<Availability>,
    pub rules_list: Option<Vec<RuleGroup>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
