mod health;
mod products;
mod taxonomy;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/v1/products/validate", post(products::validate))
        .route("/v1/products/search", post(products::search))
        .route("/v1/products/download", post(products::download))
        .route(
            "/v1/products",
            get(products::list).post(products::create),
        )
        .route(
            "/v1/products/{id}",
            get(products::get_one).put(products::update),
        )
        .route("/v1/taxonomy", get(taxonomy::find))
        .route("/v1/taxonomy-master", get(taxonomy::find_master))
}
