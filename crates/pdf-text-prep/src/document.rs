use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::detect::{FileType, detect_type};

/// An uploaded buffer plus whatever the uploader claimed about it.
///
/// The claimed name and content type are advisory; analysis only looks at the
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    bytes: Vec<u8>,
    file_name: Option<String>,
    declared_content_type: Option<String>,
}

impl RawDocument {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
            declared_content_type: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.declared_content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn declared_content_type(&self) -> Option<&str> {
        self.declared_content_type.as_deref()
    }

    #[must_use]
    pub fn detected_type(&self) -> FileType {
        detect_type(&self.bytes)
    }

    /// True when a declared content type is present and names something other
    /// than what the bytes are. Parameters such as `; charset=` are ignored.
    #[must_use]
    pub fn declared_type_mismatch(&self) -> bool {
        let Some(declared) = self.declared_content_type.as_deref() else {
            return false;
        };
        let declared = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if declared.is_empty() || declared == "application/octet-stream" {
            return false;
        }
        self.detected_type().mime() != Some(declared.as_str())
    }
}

/// Parser-reported descriptive fields, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Entries of the document Info dictionary (Title, Author, Producer, ...).
    pub info: BTreeMap<String, String>,
    /// Flattened XMP properties keyed by qualified name, e.g. `dc:title`.
    pub metadata: BTreeMap<String, String>,
    #[serde(rename = "numpages")]
    pub page_count: usize,
    pub version: String,
}

/// Successful analysis output: metadata plus the cleaned whole-document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    pub metadata: DocumentMetadata,
    pub text: String,
}

impl AnalyzedDocument {
    /// True when boilerplate removal left nothing but whitespace, which is
    /// always the case for single-page documents.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
