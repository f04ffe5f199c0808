use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub struct PdfInfo<'a> {
    pub title: &'a str,
    pub author: &'a str,
}

/// The font the fixture's pages select with `Tf`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixtureFont {
    #[default]
    Courier,
    WithoutBaseFont,
    WithoutSubtype,
    /// `Tf` names a font the page resources do not define.
    Unresolved,
}

#[derive(Default)]
pub struct PdfOptions<'a> {
    pub info: Option<&'a PdfInfo<'a>>,
    pub font: FixtureFont,
    pub xmp: Option<&'a str>,
}

pub fn build_test_pdf(
    pages: &[Vec<&str>],
    info: Option<&PdfInfo<'_>>,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    build_pdf(
        pages,
        &PdfOptions {
            info,
            ..PdfOptions::default()
        },
    )
}

pub fn build_pdf(
    pages: &[Vec<&str>],
    options: &PdfOptions<'_>,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font = match options.font {
        FixtureFont::WithoutBaseFont => dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
        },
        FixtureFont::WithoutSubtype => dictionary! {
            "Type" => "Font",
            "BaseFont" => "Courier",
        },
        FixtureFont::Courier | FixtureFont::Unresolved => dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        },
    };
    let selected_font = if options.font == FixtureFont::Unresolved {
        "F9"
    } else {
        "F1"
    };
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();

    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![selected_font.into(), 12.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];

        for (index, line) in lines.iter().enumerate() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(xmp) = options.xmp {
        let metadata_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "Metadata",
                "Subtype" => "XML",
            },
            xmp.as_bytes().to_vec(),
        ));
        catalog.set("Metadata", metadata_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    if let Some(info) = options.info {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(info.title),
            "Author" => Object::string_literal(info.author),
            "Producer" => Object::string_literal("pdf-text-prep tests"),
        });
        doc.trailer.set("Info", info_id);
    }
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

pub fn write_test_pdf(
    path: &Path,
    pages: &[Vec<&str>],
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = build_test_pdf(pages, None)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Ten pages with a constant running header, a numbered footer and one line
/// of body text each.
pub fn ten_page_report() -> Vec<Vec<String>> {
    (1..=10)
        .map(|page| {
            vec![
                "Confidential Acme Corp".to_string(),
                format!("Findings for section {page} of the annual audit."),
                format!("Page {page} of 10"),
            ]
        })
        .collect()
}

pub fn as_str_pages(pages: &[Vec<String>]) -> Vec<Vec<&str>> {
    pages
        .iter()
        .map(|lines| lines.iter().map(String::as_str).collect())
        .collect()
}
