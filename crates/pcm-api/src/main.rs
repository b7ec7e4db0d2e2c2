use std::sync::Arc;

use pcm_catalog::ProjectionConfig;
use pcm_service::{ProductService, ServiceConfig, TaxonomyService};
use pcm_store::{MemoryStore, RecordingPublisher};

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let api_addr = std::env::var("PCM_API_ADDR").unwrap_or_else(|_| "0.0.0.0:9700".into());

    let store = Arc::new(MemoryStore::new());
    let publisher = Arc::new(RecordingPublisher::new());
    let projections = Arc::new(ProjectionConfig::new());
    let config = ServiceConfig::default();

    let state = AppState {
        products: Arc::new(ProductService::new(
            store.clone(),
            publisher,
            projections.clone(),
            config,
        )),
        taxonomy: Arc::new(TaxonomyService::new(store, projections)),
    };

    let app = routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("failed to bind {api_addr}: {e}");
            std::process::exit(1);
        });

    tracing::info!("pcm-api listening on {api_addr}");
    axum::serve(listener, app).await.unwrap();
}
