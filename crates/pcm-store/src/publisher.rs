use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use pcm_service::{EventPublisher, PublishError};

#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub bucket: String,
    pub path: String,
    pub file_name: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub queue: String,
    pub body: String,
    pub dedupe_key: Option<String>,
}

/// Event publisher that records instead of sending. Backs the dev server
/// and the service integration tests.
#[derive(Default)]
pub struct RecordingPublisher {
    uploads: Mutex<Vec<UploadRecord>>,
    messages: Mutex<Vec<MessageRecord>>,
    next_id: AtomicU64,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().expect("poisoned").clone()
    }

    pub fn messages(&self) -> Vec<MessageRecord> {
        self.messages.lock().expect("poisoned").clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        file_name: &str,
        payload: &[u8],
    ) -> Result<String, PublishError> {
        let url = format!("s3://{bucket}/{path}/{file_name}");
        self.uploads
            .lock()
            .map_err(|_| PublishError("lock poisoned".into()))?
            .push(UploadRecord {
                bucket: bucket.to_string(),
                path: path.to_string(),
                file_name: file_name.to_string(),
                payload: payload.to_vec(),
            });
        Ok(url)
    }

    fn send_message(
        &self,
        queue: &str,
        body: &str,
        dedupe_key: Option<&str>,
    ) -> Result<String, PublishError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .map_err(|_| PublishError("lock poisoned".into()))?
            .push(MessageRecord {
                queue: queue.to_string(),
                body: body.to_string(),
                dedupe_key: dedupe_key.map(str::to_string),
            });
        Ok(format!("msg-{id}"))
    }
}
