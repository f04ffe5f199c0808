use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::AnalyzeError;

/// Separator placed between consecutive pages in [`ParsedPdf::text`].
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// `TJ` adjustments below this (thousandths of text space) read as a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -100.0;

/// Everything a structural parse reports about a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPdf {
    pub info: BTreeMap<String, String>,
    pub xmp: BTreeMap<String, String>,
    pub page_count: usize,
    pub version: String,
    /// Whole-document text with [`PAGE_SEPARATOR`] between pages.
    pub text: String,
}

/// Turns PDF bytes into text and descriptive fields.
///
/// Callers have already confirmed the bytes carry a PDF signature.
pub trait PdfParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedPdf, AnalyzeError>;
}

/// Parser backed by `lopdf` for structure and `pdf-extract` for text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfParser;

impl PdfParser for LopdfParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedPdf, AnalyzeError> {
        let document = Document::load_mem(bytes)?;
        let page_count = document.get_pages().len();
        let pages = read_page_texts(&document, bytes, page_count)?;
        let separator = PAGE_SEPARATOR.to_string();

        Ok(ParsedPdf {
            info: read_info(&document),
            xmp: read_xmp(&document),
            page_count,
            version: document.version.clone(),
            text: pages.join(separator.as_str()),
        })
    }
}

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split(PAGE_SEPARATOR)
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.len() > 1 && pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn read_page_texts(
    document: &Document,
    bytes: &[u8],
    page_count: usize,
) -> Result<Vec<String>, AnalyzeError> {
    let extracted = if fonts_are_extractable(document) {
        run_pdf_extract(bytes)
    } else {
        Err("a font used by page content is missing or incomplete".to_string())
    };
    if let Ok(text) = &extracted {
        let pages = split_text_into_pages(text);
        if pages.len() == page_count {
            return Ok(pages);
        }
    }

    let from_content = document
        .get_pages()
        .values()
        .map(|page_id| extract_text_from_page_content(document, *page_id).unwrap_or_default())
        .collect::<Vec<_>>();
    if from_content.iter().any(|text| !text.trim().is_empty()) {
        return Ok(from_content);
    }

    match extracted {
        Ok(text) if !text.trim().is_empty() => Ok(vec![text]),
        Ok(_) => Ok(from_content),
        Err(reason) => Err(AnalyzeError::MalformedPdf(format!(
            "failed to extract PDF text: {reason}"
        ))),
    }
}

/// `pdf-extract` panics instead of failing on some malformed fonts; a panic
/// is reported as an ordinary extraction failure.
fn run_pdf_extract(bytes: &[u8]) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(error)) => Err(error.to_string()),
        Err(payload) => Err(panic_reason(payload.as_ref())),
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("text extractor panicked: {detail}")
}

/// Every font selected with `Tf` must resolve on its page and carry the
/// entries `pdf-extract` reads unconditionally: `/Subtype`, and `/BaseFont`
/// for anything but Type 3 fonts.
fn fonts_are_extractable(document: &Document) -> bool {
    document.get_pages().values().all(|page_id| {
        let fonts = document.get_page_fonts(*page_id);
        page_font_names(document, *page_id).iter().all(|name| {
            fonts.get(name).is_some_and(|font| font_is_complete(font))
        })
    })
}

fn font_is_complete(font: &Dictionary) -> bool {
    match font.get(b"Subtype").and_then(Object::as_name) {
        Ok(b"Type3") => true,
        Ok(_) => font.get(b"BaseFont").is_ok(),
        Err(_) => false,
    }
}

fn page_font_names(document: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
    let Some(content) = document
        .get_page_content(page_id)
        .ok()
        .and_then(|raw| Content::decode(&raw).ok())
    else {
        return Vec::new();
    };
    content
        .operations
        .iter()
        .filter(|operation| operation.operator == "Tf")
        .filter_map(|operation| operation.operands.first()?.as_name().ok())
        .map(<[u8]>::to_vec)
        .collect()
}

fn decode_content_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(&bytes[2..]);
        if !had_errors {
            return utf16.into_owned();
        }
    }

    if let Some(name) = encoding {
        let lower = name.to_ascii_lowercase();
        if lower.contains("utf16") || lower.contains("ucs2") || lower.contains("identity-h") {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }
    }

    Document::decode_text(encoding, bytes)
}

/// Lines of one page as its text-showing operators produce them.
#[derive(Default)]
struct PageLines<'a> {
    finished: Vec<String>,
    open: String,
    encoding: Option<&'a str>,
}

impl PageLines<'_> {
    fn show(&mut self, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    let decoded = decode_content_bytes(self.encoding, bytes);
                    self.open.push_str(&decoded);
                }
                Object::Array(items) => self.show(items),
                Object::Integer(_) | Object::Real(_) => {
                    if operand.as_float().is_ok_and(|gap| gap < WORD_GAP_ADJUSTMENT) {
                        self.open.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    fn end_line(&mut self) {
        let line = std::mem::take(&mut self.open);
        if !line.trim().is_empty() {
            self.finished.push(line);
        }
    }

    fn into_text(mut self) -> Option<String> {
        self.end_line();
        (!self.finished.is_empty()).then(|| self.finished.join("\n"))
    }
}

/// Rebuilds page text from the page's content stream. Used when
/// `pdf-extract` fails or disagrees with the page tree.
fn extract_text_from_page_content(document: &Document, page_id: ObjectId) -> Option<String> {
    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = PageLines::default();
    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "Tf" => {
                let font_name = operands.first().and_then(|operand| operand.as_name().ok());
                lines.encoding = font_name.and_then(|name| encodings.get(name).copied());
            }
            "Tj" | "TJ" => lines.show(operands),
            "'" | "\"" => {
                lines.end_line();
                lines.show(operands);
            }
            "T*" | "Td" | "TD" | "ET" => lines.end_line(),
            _ => {}
        }
    }
    lines.into_text()
}

/// Decodes an Info-dictionary string: UTF-16BE when it carries a BOM,
/// otherwise UTF-8 if valid, else the Latin-1 superset PDFDocEncoding is
/// closest to.
fn decode_info_string(bytes: &[u8]) -> String {
    let decoded = if bytes.starts_with(&[0xFE, 0xFF]) {
        UTF_16BE
            .decode_without_bom_handling(&bytes[2..])
            .0
            .into_owned()
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        text.to_string()
    } else {
        WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
    };
    decoded.trim_end_matches('\0').to_string()
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dictionary<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(document, object)? {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn info_value_to_string(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_info_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(value) => Some(value.to_string()),
        Object::Real(value) => Some(value.to_string()),
        Object::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

fn read_info(document: &Document) -> BTreeMap<String, String> {
    let Some(info) = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| resolve_dictionary(document, object))
    else {
        return BTreeMap::new();
    };

    info.iter()
        .filter_map(|(key, value)| {
            let value = resolve(document, value).and_then(info_value_to_string)?;
            Some((String::from_utf8_lossy(key).into_owned(), value))
        })
        .collect()
}

fn read_xmp(document: &Document) -> BTreeMap<String, String> {
    let stream = document
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|root| resolve_dictionary(document, root))
        .and_then(|catalog| catalog.get(b"Metadata").ok())
        .and_then(|metadata| resolve(document, metadata));
    let Some(Object::Stream(stream)) = stream else {
        return BTreeMap::new();
    };

    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    parse_xmp(&String::from_utf8_lossy(&bytes))
}

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XMP_META_NS: &str = "adobe:ns:meta/";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// `prefix:local` for a namespaced name, or `None` for the RDF/XMP
/// scaffolding and unqualified names.
fn xmp_property_name(
    scope: roxmltree::Node,
    namespace: Option<&str>,
    local: &str,
) -> Option<String> {
    let namespace = namespace?;
    if [RDF_NS, XMP_META_NS, XML_NS].contains(&namespace) {
        return None;
    }
    let prefix = scope
        .lookup_prefix(namespace)
        .filter(|prefix| !prefix.is_empty())?;
    Some(format!("{prefix}:{local}"))
}

fn insert_xmp_value(fields: &mut BTreeMap<String, String>, name: String, value: &str) {
    fields
        .entry(name)
        .and_modify(|existing| {
            existing.push_str(", ");
            existing.push_str(value);
        })
        .or_insert_with(|| value.to_string());
}

/// Flattens an XMP packet into `prefix:name -> value`. Array items
/// (`rdf:li`) are attributed to their enclosing property and joined with
/// `", "`. Entities and CDATA sections come back decoded. A packet that is
/// not well-formed XML yields no fields.
pub(crate) fn parse_xmp(xml: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let xml = xml.trim_start_matches(|c: char| c == '\u{FEFF}' || c.is_whitespace());
    let Ok(packet) = roxmltree::Document::parse(xml) else {
        return fields;
    };

    for node in packet.descendants() {
        if node.is_element() && node.has_tag_name((RDF_NS, "Description")) {
            for attribute in node.attributes() {
                let value = attribute.value().trim();
                if value.is_empty() {
                    continue;
                }
                let name = xmp_property_name(node, attribute.namespace(), attribute.name());
                if let Some(name) = name {
                    insert_xmp_value(&mut fields, name, value);
                }
            }
        } else if node.is_text() {
            let Some(value) = node.text().map(str::trim).filter(|value| !value.is_empty()) else {
                continue;
            };
            let property = node
                .ancestors()
                .filter(roxmltree::Node::is_element)
                .find_map(|element| {
                    let tag = element.tag_name();
                    xmp_property_name(element, tag.namespace(), tag.name())
                });
            if let Some(name) = property {
                insert_xmp_value(&mut fields, name, value);
            }
        }
    }

    fields
}
