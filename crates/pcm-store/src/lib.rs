mod matcher;
mod memory;
mod publisher;

pub use matcher::matches;
pub use memory::MemoryStore;
pub use publisher::{MessageRecord, RecordingPublisher, UploadRecord};
