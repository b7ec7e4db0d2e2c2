use serde::{Deserialize, Serialize};

/// Per-environment names for the event-publishing collaborators.
/// Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub bucket: String,
    pub downloads_prefix: String,
    pub events_prefix: String,
    pub download_queue: String,
    pub event_queue: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bucket: "pcm-exports".into(),
            downloads_prefix: "downloads".into(),
            events_prefix: "events".into(),
            download_queue: "pcm-download-requests".into(),
            event_queue: "pcm-product-events".into(),
        }
    }
}
