use thiserror::Error;

/// Every way an analysis can fail on expected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    #[error("input is empty; can only parse PDF files")]
    EmptyInput,

    #[error("can only parse PDF files (detected {detected})")]
    NotAPdf { detected: String },

    #[error("failed to parse PDF: {0}")]
    MalformedPdf(String),

    #[error("cannot parse scanned PDFs yet")]
    ScannedDocument,

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl AnalyzeError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::NotAPdf { .. } => "not_a_pdf",
            Self::MalformedPdf(_) => "malformed_pdf",
            Self::ScannedDocument => "scanned_document",
            Self::InvalidOption(_) => "invalid_option",
        }
    }

    /// True for the two cases that mean "this upload is not a PDF at all".
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::NotAPdf { .. })
    }
}

impl From<lopdf::Error> for AnalyzeError {
    fn from(error: lopdf::Error) -> Self {
        Self::MalformedPdf(error.to_string())
    }
}
