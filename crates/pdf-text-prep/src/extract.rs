use crate::document::DocumentMetadata;
use crate::error::AnalyzeError;
use crate::parser::{PAGE_SEPARATOR, PdfParser};

/// Metadata plus the ordered per-page text of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPages {
    pub metadata: DocumentMetadata,
    pub pages: Vec<String>,
}

/// Splits separator-delimited text into pages. Zero reported pages means the
/// whole text is one page.
#[must_use]
pub fn split_pages(text: &str, page_count: usize) -> Vec<String> {
    if page_count == 0 {
        return vec![text.to_string()];
    }
    text.split(PAGE_SEPARATOR).map(str::to_string).collect()
}

/// Unicode scalar values in the trimmed text. Separators between pages
/// count like any other character.
fn content_chars(text: &str) -> usize {
    text.trim().chars().count()
}

/// Runs the parser and splits its text into pages.
///
/// Fails with [`AnalyzeError::ScannedDocument`] when fewer than
/// `min_text_chars` characters of text come back, which in practice means an
/// image-only PDF.
pub fn extract_pages<P>(
    parser: &P,
    bytes: &[u8],
    min_text_chars: usize,
) -> Result<ExtractedPages, AnalyzeError>
where
    P: PdfParser + ?Sized,
{
    let parsed = parser.parse(bytes)?;
    if content_chars(&parsed.text) < min_text_chars {
        return Err(AnalyzeError::ScannedDocument);
    }

    let pages = split_pages(&parsed.text, parsed.page_count);
    Ok(ExtractedPages {
        metadata: DocumentMetadata {
            info: parsed.info,
            metadata: parsed.xmp,
            page_count: parsed.page_count,
            version: parsed.version,
        },
        pages,
    })
}
