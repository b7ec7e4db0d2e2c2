use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishError(pub String);

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PublishError {}

/// Outbound event-publishing seam: upload a payload to the object store,
/// then enqueue a message pointing at it.
pub trait EventPublisher: Send + Sync {
    /// Returns the location URL of the uploaded object.
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        file_name: &str,
        payload: &[u8],
    ) -> Result<String, PublishError>;

    /// Returns the queue's message id.
    fn send_message(
        &self,
        queue: &str,
        body: &str,
        dedupe_key: Option<&str>,
    ) -> Result<String, PublishError>;
}

/// Message envelope consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub application: &'static str,
    /// Milliseconds since the epoch.
    pub message_timestamp: i64,
    pub source_file_url: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishing_item_id: Option<String>,
}

impl EventEnvelope {
    pub const APPLICATION: &'static str = "PAC API";

    pub fn new(source_file_url: String, status: impl Into<String>) -> Self {
        Self {
            application: Self::APPLICATION,
            message_timestamp: bson::DateTime::now().timestamp_millis(),
            source_file_url,
            status: status.into(),
            asset_type: None,
            publishing_item_id: None,
        }
    }
}
