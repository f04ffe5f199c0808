mod analyzer;
mod boilerplate;
mod detect;
mod document;
mod error;
mod extract;
mod options;
mod parser;

pub use analyzer::{AnalysisResult, DocumentAnalyzer, PAGE_JOINER, analyze};
pub use boilerplate::{
    FilterReport, LineFrequencyTable, boilerplate_threshold, filter_boilerplate,
    filter_boilerplate_with_report,
};
pub use detect::{FileType, detect_type};
pub use document::{AnalyzedDocument, DocumentMetadata, RawDocument};
pub use error::AnalyzeError;
pub use extract::{ExtractedPages, extract_pages, split_pages};
pub use options::{AnalyzeOptions, DEFAULT_BOILERPLATE_PERCENT, DEFAULT_MIN_TEXT_CHARS};
pub use parser::{LopdfParser, PAGE_SEPARATOR, ParsedPdf, PdfParser};
