use std::sync::Arc;

use bson::{Document, doc};
use pcm_catalog::{ProductType, ProjectionConfig, ResponseGroup, identifier_field};
use pcm_query::{
    Availability, DownloadRequest, ParsedQuery, RuleGroup, SearchRequest, ValidateRequest,
    ValidationError, build_query, validate_download_request, validate_rules_request,
    validate_search_request,
};
use serde::Serialize;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::publisher::{EventEnvelope, EventPublisher};
use crate::resolver::IdentifierResolver;
use crate::store::ProductStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub records: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadReceipt {
    pub source_file_url: String,
    pub message_id: String,
    pub recipients: Vec<String>,
}

/// Orchestrates validation, query building, storage and event publication
/// for product workflows. Each operation is a linear sequence of fallible
/// steps; no step is retried here.
pub struct ProductService<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
    resolver: IdentifierResolver<S>,
    projections: Arc<ProjectionConfig>,
    config: ServiceConfig,
}

impl<S: ProductStore, P: EventPublisher> ProductService<S, P> {
    pub fn new(
        store: Arc<S>,
        publisher: Arc<P>,
        projections: Arc<ProjectionConfig>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            resolver: IdentifierResolver::new(store.clone()),
            store,
            publisher,
            projections,
            config,
        }
    }

    pub fn resolver(&self) -> &IdentifierResolver<S> {
        &self.resolver
    }

    /// Synchronous bounded-identifier lookup: strict validation, then one
    /// storage query shaped by the group's attributes.
    pub fn validate_products(&self, req: &ValidateRequest) -> Result<SearchResponse, ServiceError> {
        validate_rules_request(req)?;
        let group = first_group(req.rules_list.as_deref())?;

        let parsed = build_query(group);
        let mut filter = parsed.filter.clone();
        if let Some(availability) = &req.availability {
            apply_availability(&mut filter, availability);
        }

        let projection = self.projection_for(&parsed)?;
        let records = self.store.find(&filter, &projection, None, None)?;
        let counts = if wants_counts(req.has_counts.as_ref()) {
            Some(self.store.count(&filter)?)
        } else {
            None
        };
        Ok(SearchResponse { records, counts })
    }

    /// Search: shape-only rule validation, availability status permitted,
    /// pagination honored.
    pub fn search_products(&self, req: &SearchRequest) -> Result<SearchResponse, ServiceError> {
        validate_search_request(req)?;
        let groups = req.rules_list.as_deref().unwrap_or_default();

        let mut records = Vec::new();
        let mut counts = wants_counts(req.has_counts.as_ref()).then_some(0u64);
        for group in groups {
            let parsed = build_query(group);
            let mut filter = parsed.filter.clone();
            if let Some(availability) = &req.availability {
                apply_availability(&mut filter, availability);
            }
            let projection = self.projection_for(&parsed)?;
            records.extend(
                self.store
                    .find(&filter, &projection, req.limit, req.offset)?,
            );
            if let Some(total) = counts.as_mut() {
                *total += self.store.count(&filter)?;
            }
        }
        Ok(SearchResponse { records, counts })
    }

    /// Search-and-download: broad result sets serialized and handed to the
    /// event-publishing collaborator (upload, then enqueue).
    pub fn search_and_download(
        &self,
        req: &DownloadRequest,
    ) -> Result<DownloadReceipt, ServiceError> {
        validate_download_request(req)?;
        let groups = req.rules_list.as_deref().unwrap_or_default();
        let file_name = req.file_name.as_deref().unwrap_or_default();

        let mut records = Vec::new();
        for group in groups {
            let parsed = build_query(group);
            let mut filter = parsed.filter.clone();
            if let Some(availability) = &req.availability {
                apply_availability(&mut filter, availability);
            }
            let projection = self.projection_for(&parsed)?;
            records.extend(self.store.find(&filter, &projection, None, None)?);
        }

        let payload = serde_json::to_vec(&records)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        let url = self.publisher.upload(
            &self.config.bucket,
            &self.config.downloads_prefix,
            file_name,
            &payload,
        )?;

        let envelope = EventEnvelope::new(url.clone(), "READY");
        let body = serde_json::to_string(&envelope)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        let message_id =
            self.publisher
                .send_message(&self.config.download_queue, &body, Some(file_name))?;

        tracing::info!(file_name, message_id, "download payload published");

        let recipients = req
            .recipients
            .as_ref()
            .and_then(|r| r.to.clone())
            .unwrap_or_default();
        Ok(DownloadReceipt {
            source_file_url: url,
            message_id,
            recipients,
        })
    }

    /// Cross-type listing, shaped by the `allProductsSmall` group.
    pub fn list_products(
        &self,
        product_type: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<SearchResponse, ServiceError> {
        let mut filter = Document::new();
        if let Some(raw) = product_type {
            let product_type = ProductType::parse(raw).ok_or_else(|| {
                ServiceError::Validation(ValidationError::single(
                    "/type",
                    format!("Invalid type {raw}"),
                ))
            })?;
            filter.insert("type", product_type.as_str());
        }
        let projection = self.projections.all_products_small_fields().to_vec();
        let records = self.store.find(&filter, &projection, limit, offset)?;
        Ok(SearchResponse {
            records,
            counts: None,
        })
    }

    pub fn get_product(
        &self,
        id: &str,
        group: Option<ResponseGroup>,
    ) -> Result<Document, ServiceError> {
        let record = self
            .store
            .get(id, &[])?
            .ok_or_else(|| ServiceError::NotFound(format!("product not found: {id}")))?;

        let Some(group) = group else {
            return Ok(record);
        };
        let Some(product_type) = record.get_str("type").ok().and_then(ProductType::parse) else {
            // legacy records without a known type are returned unshaped
            return Ok(record);
        };
        let fields = self.projections.fields(product_type, group)?.to_vec();
        let shaped = self
            .store
            .get(id, &fields)?
            .ok_or_else(|| ServiceError::NotFound(format!("product not found: {id}")))?;
        Ok(shaped)
    }

    /// Create: business-rule checks, uniqueness via identifier resolution,
    /// UUIDv4 primary key, insert, publish.
    pub fn create_product(&self, mut record: Document) -> Result<Document, ServiceError> {
        let product_type = record
            .get_str("type")
            .ok()
            .and_then(ProductType::parse)
            .ok_or_else(|| {
                ServiceError::Validation(ValidationError::single(
                    "/type",
                    "type must be one of the supported product types",
                ))
            })?;

        let identifiers = record.get_document("identifiers").cloned().ok();
        match &identifiers {
            None => {
                return Err(ServiceError::Validation(ValidationError::single(
                    "/identifiers",
                    "At least one identifier is required",
                )));
            }
            Some(identifiers) if identifiers.is_empty() => {
                return Err(ServiceError::Validation(ValidationError::single(
                    "/identifiers",
                    "At least one identifier is required",
                )));
            }
            Some(identifiers) => {
                for (name, value) in identifiers {
                    if identifier_field(name).is_none() {
                        continue;
                    }
                    let resolution = self.resolver.resolve(name, value)?;
                    if resolution.id.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "a product with {name} {value} already exists"
                        )));
                    }
                }
            }
        }

        let id = match record.get_str("_id") {
            Ok(id) => {
                if self.store.get(id, &[])?.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "a product with _id {id} already exists"
                    )));
                }
                id.to_string()
            }
            Err(_) => uuid::Uuid::new_v4().to_string(),
        };
        record.insert("_id", id.as_str());
        record.insert("modifiedAt", bson::DateTime::now());

        self.store.insert(record.clone())?;
        self.publish_event(&id, product_type, "CREATED", &record)?;
        Ok(record)
    }

    /// Update: existence check, replace, publish.
    pub fn update_product(
        &self,
        id: &str,
        mut record: Document,
    ) -> Result<Document, ServiceError> {
        let product_type = record
            .get_str("type")
            .ok()
            .and_then(ProductType::parse)
            .ok_or_else(|| {
                ServiceError::Validation(ValidationError::single(
                    "/type",
                    "type must be one of the supported product types",
                ))
            })?;

        if self.store.get(id, &[])?.is_none() {
            return Err(ServiceError::NotFound(format!("product not found: {id}")));
        }

        record.insert("_id", id);
        record.insert("modifiedAt", bson::DateTime::now());
        if !self.store.replace(id, record.clone())? {
            return Err(ServiceError::NotFound(format!("product not found: {id}")));
        }
        self.publish_event(id, product_type, "UPDATED", &record)?;
        Ok(record)
    }

    fn publish_event(
        &self,
        id: &str,
        product_type: ProductType,
        status: &str,
        record: &Document,
    ) -> Result<(), ServiceError> {
        let payload = serde_json::to_vec(record)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        let file_name = format!("{id}.json");
        let url = self.publisher.upload(
            &self.config.bucket,
            &self.config.events_prefix,
            &file_name,
            &payload,
        )?;

        let mut envelope = EventEnvelope::new(url, status);
        envelope.asset_type = Some(product_type.as_str().to_string());
        envelope.publishing_item_id = Some(id.to_string());
        let body = serde_json::to_string(&envelope)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        let message_id = self
            .publisher
            .send_message(&self.config.event_queue, &body, Some(id))?;

        tracing::info!(id, %product_type, status, message_id, "product event published");
        Ok(())
    }

    /// Projection for one parsed group: the caller's expanded attributes,
    /// or the type's `small` response group when none were requested.
    fn projection_for(&self, parsed: &ParsedQuery) -> Result<Vec<String>, ServiceError> {
        if !parsed.attributes.is_empty() {
            return Ok(parsed.attributes.clone());
        }
        match ProductType::parse(&parsed.product_type) {
            Some(product_type) => Ok(self
                .projections
                .fields(product_type, ResponseGroup::Small)?
                .to_vec()),
            // shape-validated groups may carry types outside the catalog;
            // fetch whole records rather than guess a projection
            None => Ok(Vec::new()),
        }
    }
}

fn first_group(rules_list: Option<&[RuleGroup]>) -> Result<&RuleGroup, ServiceError> {
    rules_list.and_then(|groups| groups.first()).ok_or_else(|| {
        ServiceError::Validation(ValidationError::single(
            "/rulesList",
            "Invalid or missing rulesList.",
        ))
    })
}

fn wants_counts(has_counts: Option<&serde_json::Value>) -> bool {
    has_counts.and_then(serde_json::Value::as_bool).unwrap_or(false)
}

fn apply_availability(filter: &mut Document, availability: &Availability) {
    if let Some(name) = &availability.name {
        filter.insert("availability.name", name.as_str());
    }
    if let Some(status) = &availability.status {
        filter.insert("availability.status", doc! { "$in": status.clone() });
    }
}
