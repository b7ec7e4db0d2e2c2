use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use bson::Document;
use pcm_catalog::ResponseGroup;
use pcm_query::{DownloadRequest, SearchRequest, ValidateRequest};
use pcm_service::{DownloadReceipt, SearchResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let response = state.products.validate_products(&req)?;
        Ok(Json(response))
    })
    .await
    .unwrap()
}

pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let response = state.products.search_products(&req)?;
        Ok(Json(response))
    })
    .await
    .unwrap()
}

pub async fn download(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<(StatusCode, Json<DownloadReceipt>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let receipt = state.products.search_and_download(&req)?;
        Ok((StatusCode::ACCEPTED, Json(receipt)))
    })
    .await
    .unwrap()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(rename = "type")]
    product_type: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let response = state.products.list_products(
            params.product_type.as_deref(),
            params.limit,
            params.offset,
        )?;
        Ok(Json(response))
    })
    .await
    .unwrap()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    response_group: Option<ResponseGroup>,
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<GetParams>,
) -> Result<Json<Document>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let record = state.products.get_product(&id, params.response_group)?;
        Ok(Json(record))
    })
    .await
    .unwrap()
}

pub async fn create(
    State(state): State<AppState>,
    Json(record): Json<Document>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let created = state.products.create_product(record)?;
        Ok((StatusCode::CREATED, Json(created)))
    })
    .await
    .unwrap()
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(record): Json<Document>,
) -> Result<Json<Document>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let updated = state.products.update_product(&id, record)?;
        Ok(Json(updated))
    })
    .await
    .unwrap()
}
