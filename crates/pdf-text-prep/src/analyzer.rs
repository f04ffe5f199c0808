use crate::boilerplate::filter_boilerplate_with_report;
use crate::detect::detect_type;
use crate::document::{AnalyzedDocument, RawDocument};
use crate::error::AnalyzeError;
use crate::extract::extract_pages;
use crate::options::AnalyzeOptions;
use crate::parser::{LopdfParser, PdfParser};

/// Separator between cleaned pages in [`AnalyzedDocument::text`].
pub const PAGE_JOINER: &str = "\n\n";

pub type AnalysisResult = Result<AnalyzedDocument, AnalyzeError>;

/// Runs sniffing, extraction and boilerplate removal for one document.
///
/// Holds no per-document state, so one analyzer can serve any number of
/// concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer<P = LopdfParser> {
    parser: P,
    options: AnalyzeOptions,
}

impl DocumentAnalyzer<LopdfParser> {
    #[must_use]
    pub fn new(options: AnalyzeOptions) -> Self {
        Self::with_parser(LopdfParser, options)
    }
}

impl<P: PdfParser> DocumentAnalyzer<P> {
    #[must_use]
    pub fn with_parser(parser: P, options: AnalyzeOptions) -> Self {
        Self { parser, options }
    }

    #[must_use]
    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    pub fn analyze(&self, bytes: &[u8]) -> AnalysisResult {
        self.analyze_with_removed(bytes).map(|(document, _)| document)
    }

    pub fn analyze_document(&self, document: &RawDocument) -> AnalysisResult {
        self.analyze(document.bytes())
    }

    /// Same as [`Self::analyze`], also returning the boilerplate lines that
    /// were stripped.
    pub fn analyze_with_removed(
        &self,
        bytes: &[u8],
    ) -> Result<(AnalyzedDocument, Vec<String>), AnalyzeError> {
        self.options.validate()?;

        if bytes.is_empty() {
            return Err(AnalyzeError::EmptyInput);
        }
        let file_type = detect_type(bytes);
        if !file_type.is_pdf() {
            return Err(AnalyzeError::NotAPdf {
                detected: file_type.label().to_string(),
            });
        }

        let extracted = extract_pages(&self.parser, bytes, self.options.min_text_chars)?;
        let report =
            filter_boilerplate_with_report(&extracted.pages, self.options.boilerplate_percent);

        Ok((
            AnalyzedDocument {
                metadata: extracted.metadata,
                text: report.pages.join(PAGE_JOINER),
            },
            report.removed_lines,
        ))
    }
}

/// Analyzes `bytes` with the default parser and options.
pub fn analyze(bytes: &[u8]) -> AnalysisResult {
    DocumentAnalyzer::new(AnalyzeOptions::default()).analyze(bytes)
}
