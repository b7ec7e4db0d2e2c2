use axum::Json;
use axum::extract::{Query, State};
use pcm_service::{TaxonomyMasterQuery, TaxonomyNode, TaxonomyQuery};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn find(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<Vec<TaxonomyNode>>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let nodes = state.taxonomy.find(&query)?;
        Ok(Json(nodes))
    })
    .await
    .unwrap()
}

pub async fn find_master(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyMasterQuery>,
) -> Result<Json<Vec<TaxonomyNode>>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let nodes = state.taxonomy.find_master(&query)?;
        Ok(Json(nodes))
    })
    .await
    .unwrap()
}
