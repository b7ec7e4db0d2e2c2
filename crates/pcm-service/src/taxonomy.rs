use std::sync::Arc;

use bson::{Bson, Document, doc};
use pcm_catalog::ProjectionConfig;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::TaxonomyStore;

/// Query parameters for the general per-asset-type taxonomy tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyQuery {
    #[serde(rename = "type")]
    pub taxonomy_type: Option<String>,
    pub asset_type: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub is_code_prefix: bool,
    pub level: Option<i32>,
    #[serde(default)]
    pub extend_level: bool,
}

/// Query parameters for the classification master tree, keyed by family
/// (`rom`, `hobs`, `ubx`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyMasterQuery {
    #[serde(default)]
    pub classification_family: String,
    pub classification_type: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub include_children: bool,
    pub level: Option<i32>,
}

/// Common output shape for both trees. Ids are coerced to strings
/// regardless of how the source tree stores them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    #[serde(rename = "_id")]
    pub id: String,
    pub classification_type: Option<String>,
    pub code: Option<String>,
    pub level: Option<i32>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
}

/// Storage filter for the general taxonomy tree.
pub fn build_taxonomy_filter(query: &TaxonomyQuery) -> Document {
    let mut filter = doc! { "status": "active" };
    if let Some(taxonomy_type) = &query.taxonomy_type {
        filter.insert("type", taxonomy_type.as_str());
    }
    if let Some(asset_type) = &query.asset_type {
        filter.insert("assetType", asset_type.as_str());
    }
    if let Some(name) = &query.name {
        filter.insert("name", name.as_str());
    }
    if let Some(code) = &query.code {
        if query.is_code_prefix {
            filter.insert("code", doc! { "$regex": prefix_pattern(code) });
        } else {
            filter.insert("code", code.as_str());
        }
    }
    if let Some(level) = query.level {
        if query.extend_level {
            filter.insert("level", doc! { "$gte": level });
        } else {
            filter.insert("level", level);
        }
    }
    filter
}

/// Storage filter for the master tree. Note the prefix activation differs
/// from the general tree: a code becomes a prefix match whenever a level
/// constraint or child expansion is present, there is no explicit flag.
pub fn build_taxonomy_master_filter(query: &TaxonomyMasterQuery) -> Document {
    let mut filter = doc! {
        "status": "active",
        "classificationFamily": query.classification_family.as_str(),
    };
    if let Some(classification_type) = &query.classification_type {
        filter.insert("classificationType", classification_type.as_str());
    }
    if let Some(code) = &query.code {
        if query.level.is_some() || query.include_children {
            filter.insert("code", doc! { "$regex": prefix_pattern(code) });
        } else {
            filter.insert("code", code.as_str());
        }
    }
    if let Some(level) = query.level {
        if query.include_children {
            filter.insert("level", doc! { "$gte": level });
        } else {
            filter.insert("level", level);
        }
    }
    filter
}

/// Re-derive a general-tree query from a master query. The ubx family
/// happens to live in the general taxonomy tree, so master queries for it
/// are redirected with `isCodePrefix` computed from the presence of a code
/// together with either a level or child expansion.
pub fn ubx_query(query: &TaxonomyMasterQuery) -> TaxonomyQuery {
    TaxonomyQuery {
        taxonomy_type: Some("ubx".into()),
        asset_type: None,
        name: None,
        code: query.code.clone(),
        is_code_prefix: query.code.is_some() && (query.level.is_some() || query.include_children),
        level: query.level,
        extend_level: query.include_children,
    }
}

fn prefix_pattern(code: &str) -> String {
    format!("^{}", regex::escape(code))
}

pub struct TaxonomyService<S> {
    store: Arc<S>,
    projections: Arc<ProjectionConfig>,
}

impl<S: TaxonomyStore> TaxonomyService<S> {
    pub fn new(store: Arc<S>, projections: Arc<ProjectionConfig>) -> Self {
        Self { store, projections }
    }

    pub fn find(&self, query: &TaxonomyQuery) -> Result<Vec<TaxonomyNode>, ServiceError> {
        let filter = build_taxonomy_filter(query);
        let records = self
            .store
            .find_taxonomy(&filter, self.projections.taxonomy_fields())?;
        Ok(records.iter().map(normalize).collect())
    }

    pub fn find_master(
        &self,
        query: &TaxonomyMasterQuery,
    ) -> Result<Vec<TaxonomyNode>, ServiceError> {
        // ubx classifications live in the general tree.
        if query.classification_family == "ubx" {
            return self.find(&ubx_query(query));
        }
        let filter = build_taxonomy_master_filter(query);
        let records = self
            .store
            .find_taxonomy_master(&filter, self.projections.taxonomy_master_fields())?;
        Ok(records.iter().map(normalize).collect())
    }
}

fn normalize(record: &Document) -> TaxonomyNode {
    TaxonomyNode {
        id: record.get("_id").and_then(id_string).unwrap_or_default(),
        classification_type: record
            .get_str("classificationType")
            .ok()
            .map(str::to_string),
        code: record.get_str("code").ok().map(str::to_string),
        level: get_level(record),
        name: record.get_str("name").ok().map(str::to_string),
        parent_id: record.get("parentId").and_then(id_string),
    }
}

fn get_level(record: &Document) -> Option<i32> {
    match record.get("level") {
        Some(Bson::Int32(n)) => Some(*n),
        Some(Bson::Int64(n)) => i32::try_from(*n).ok(),
        Some(Bson::Double(n)) => Some(*n as i32),
        _ => None,
    }
}

fn id_string(value: &Bson) -> Option<String> {
    match value {
        Bson::String(s) => Some(s.clone()),
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        _ => None,
    }
}
