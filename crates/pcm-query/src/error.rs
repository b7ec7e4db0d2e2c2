use std::fmt;

use serde::Serialize;

/// One validation failure, addressed by a JSON-pointer-ish data path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub code: u16,
    pub data_path: String,
    pub description: String,
}

impl ValidationMessage {
    pub fn new(data_path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: 400,
            data_path: data_path.into(),
            description: description.into(),
        }
    }
}

/// Aggregate validation error. All checks run and every failure is
/// collected; the Display form joins the individual descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub messages: Vec<ValidationMessage>,
}

impl ValidationError {
    pub fn new(messages: Vec<ValidationMessage>) -> Self {
        Self { messages }
    }

    pub fn single(data_path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            messages: vec![ValidationMessage::new(data_path, description)],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .messages
            .iter()
            .map(|m| m.description.as_str())
            .collect::<Vec<_>>()
            .join(" and ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationError {}
