use serde::{Deserialize, Serialize};

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
pub const UPLOAD_FIELD: &str = "file";
pub const DEFAULT_CLASSIFIER_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";
/// Cleaned text beyond this many characters is cut before classification.
pub const MAX_PROMPT_TEXT_CHARS: usize = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub doc_type: String,
    pub doc_category: String,
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub parties: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}
