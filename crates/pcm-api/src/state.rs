use std::sync::Arc;

use pcm_service::{ProductService, TaxonomyService};
use pcm_store::{MemoryStore, RecordingPublisher};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService<MemoryStore, RecordingPublisher>>,
    pub taxonomy: Arc<TaxonomyService<MemoryStore>>,
}
