//! Request and response DTOs for the JSON API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    pub html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    pub clause: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub ner: String,
    pub segmenter: String,
    pub summarizer: String,
}
