mod common;

use pdf_text_prep::{AnalyzeError, AnalyzeOptions, DocumentAnalyzer, analyze};

use common::{
    FixtureFont, PdfInfo, PdfOptions, as_str_pages, build_pdf, build_test_pdf, ten_page_report,
};

#[test]
fn strips_running_header_from_every_page() {
    let pages = ten_page_report();
    let bytes =
        build_test_pdf(&as_str_pages(&pages), None).expect("PDF fixture should be created");

    let document = analyze(&bytes).expect("analysis should succeed");

    assert!(
        !document.text.contains("Confidential Acme Corp"),
        "header survived: {:?}",
        document.text
    );
    assert!(
        document.text.contains("Page 3 of 10"),
        "unexpected text: {:?}",
        document.text
    );
    for page in 1..=10 {
        assert!(
            document
                .text
                .contains(&format!("Findings for section {page} of")),
            "missing body of page {page}: {:?}",
            document.text
        );
    }
    assert_eq!(document.metadata.page_count, 10);
}

#[test]
fn reports_info_dictionary_and_version() {
    let pages = ten_page_report();
    let info = PdfInfo {
        title: "Annual Audit",
        author: "Jane Roe",
    };
    let bytes =
        build_test_pdf(&as_str_pages(&pages), Some(&info)).expect("PDF fixture should be created");

    let document = analyze(&bytes).expect("analysis should succeed");

    assert_eq!(document.metadata.version, "1.5");
    assert_eq!(
        document.metadata.info.get("Title").map(String::as_str),
        Some("Annual Audit")
    );
    assert_eq!(
        document.metadata.info.get("Author").map(String::as_str),
        Some("Jane Roe")
    );
    assert!(document.metadata.metadata.is_empty());
}

#[test]
fn incomplete_fonts_fall_back_to_content_streams() {
    let pages = ten_page_report();
    for font in [
        FixtureFont::WithoutBaseFont,
        FixtureFont::WithoutSubtype,
        FixtureFont::Unresolved,
    ] {
        let options = PdfOptions {
            font,
            ..PdfOptions::default()
        };
        let bytes =
            build_pdf(&as_str_pages(&pages), &options).expect("PDF fixture should be created");

        let document = analyze(&bytes).unwrap_or_else(|err| panic!("{font:?}: {err:?}"));

        assert_eq!(document.metadata.page_count, 10, "{font:?}");
        assert!(
            !document.text.contains("Confidential Acme Corp"),
            "{font:?}: header survived: {:?}",
            document.text
        );
        assert!(
            document.text.contains("Findings for section 7 of"),
            "{font:?}: missing body: {:?}",
            document.text
        );
    }
}

#[test]
fn xmp_entities_and_cdata_reach_metadata() {
    let xmp = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:pdf="http://ns.adobe.com/pdf/1.3/"
        pdf:Producer="Smith &amp; Sons">
      <dc:title><rdf:Alt><rdf:li xml:lang="x-default">Q1 &lt;draft&gt;</rdf:li></rdf:Alt></dc:title>
      <dc:description><rdf:Alt><rdf:li><![CDATA[x < y]]></rdf:li></rdf:Alt></dc:description>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;
    let pages = ten_page_report();
    let options = PdfOptions {
        xmp: Some(xmp),
        ..PdfOptions::default()
    };
    let bytes = build_pdf(&as_str_pages(&pages), &options).expect("PDF fixture should be created");

    let document = analyze(&bytes).expect("analysis should succeed");
    let fields = &document.metadata.metadata;

    assert_eq!(fields.get("pdf:Producer").map(String::as_str), Some("Smith & Sons"));
    assert_eq!(fields.get("dc:title").map(String::as_str), Some("Q1 <draft>"));
    assert_eq!(fields.get("dc:description").map(String::as_str), Some("x < y"));
}

#[test]
fn image_only_pdf_is_reported_as_scan() {
    let bytes = build_test_pdf(&[vec![], vec![]], None).expect("PDF fixture should be created");
    assert_eq!(analyze(&bytes), Err(AnalyzeError::ScannedDocument));
}

#[test]
fn single_page_pdf_loses_all_lines() {
    let bytes = build_test_pdf(
        &[vec![
            "Memorandum of understanding between the parties.",
            "Both sides agree to the terms below.",
        ]],
        None,
    )
    .expect("PDF fixture should be created");

    let document = analyze(&bytes).expect("analysis should succeed");
    assert!(document.is_blank(), "unexpected text: {:?}", document.text);
    assert_eq!(document.metadata.page_count, 1);
}

#[test]
fn broken_pdf_is_malformed_not_scanned() {
    let err = analyze(b"%PDF-1.4\nthis is not really a pdf\n%%EOF").expect_err("should fail");
    assert!(matches!(err, AnalyzeError::MalformedPdf(_)), "{err:?}");
    assert!(!err.is_rejection());
}

#[test]
fn non_pdf_upload_is_rejected() {
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    let err = analyze(&png).expect_err("should fail");
    assert_eq!(err.code(), "not_a_pdf");
    assert_eq!(analyze(b""), Err(AnalyzeError::EmptyInput));
}

#[test]
fn stricter_threshold_keeps_lines_below_it() {
    let mut pages = ten_page_report();
    for lines in pages.iter_mut().take(8) {
        lines.push("Draft".to_string());
    }
    let bytes =
        build_test_pdf(&as_str_pages(&pages), None).expect("PDF fixture should be created");

    let default = analyze(&bytes).expect("analysis should succeed");
    assert!(!default.text.contains("Draft"));

    let strict = DocumentAnalyzer::new(AnalyzeOptions {
        boilerplate_percent: 90,
        ..AnalyzeOptions::default()
    })
    .analyze(&bytes)
    .expect("analysis should succeed");
    assert!(strict.text.contains("Draft"));
    assert!(!strict.text.contains("Confidential Acme Corp"));
}
