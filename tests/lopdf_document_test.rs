// Real PDFs built with lopdf, read back through LopdfDocument
mod common;

use common::{write_text_pdf, RecordingModel, UnusedOcr};
use fi_pdf2en::pdf_extraction::{
    with_pdf, LopdfDocument, NativeTextSource, PageTextSource, PdfSource, ScanHeuristic,
    SystemPdfRenderer, TextDensityClassifier,
};
use fi_pdf2en::{Pipeline, PipelineOptions, ScanVerdict, TranslatorError};
use std::path::PathBuf;
use tempfile::TempDir;

const CAT_PAGE: &str = "Kissa istuu matolla. Se nukkuu.";
const DOG_PAGE: &str = "Koira juoksee pihalla ja aurinko paistaa kirkkaasti.";

// Renderer that cannot run, so any rasterization attempt fails loudly
fn no_renderer() -> SystemPdfRenderer {
    SystemPdfRenderer::new("fi-pdf2en-no-such-renderer")
}

fn pdf_with(pages: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.pdf");
    write_text_pdf(&path, pages);
    (dir, path)
}

#[test]
fn test_pages_read_in_document_order() {
    let (_dir, path) = pdf_with(&[CAT_PAGE, DOG_PAGE]);
    let doc = LopdfDocument::open(&path, no_renderer()).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.native_text(0).unwrap().trim(), CAT_PAGE);
    assert_eq!(doc.native_text(1).unwrap().trim(), DOG_PAGE);
    assert_eq!(doc.native_text(2), None);
}

#[test]
fn test_classification_of_real_pdfs() {
    let classifier = TextDensityClassifier::default();

    let (_dir, short) = pdf_with(&[CAT_PAGE]);
    let doc = LopdfDocument::open(&short, no_renderer()).unwrap();
    assert_eq!(classifier.classify(&doc), ScanVerdict::Scanned);

    let (_dir2, long) = pdf_with(&[CAT_PAGE, DOG_PAGE]);
    let doc = LopdfDocument::open(&long, no_renderer()).unwrap();
    assert_eq!(classifier.classify(&doc), ScanVerdict::Native);
}

#[test]
fn test_native_source_joins_pages_in_order() {
    let (_dir, path) = pdf_with(&[CAT_PAGE, DOG_PAGE]);
    let doc = LopdfDocument::open(&path, no_renderer()).unwrap();

    let extracted = NativeTextSource.extract(&doc).unwrap();

    assert_eq!(extracted.page_count, 2);
    let cat = extracted.text.find("Kissa").unwrap();
    let dog = extracted.text.find("Koira").unwrap();
    assert!(cat < dog);
    assert!(extracted.text[cat..dog].contains("\n\n"));
}

#[test]
fn test_zero_page_pdf() {
    let (_dir, path) = pdf_with(&[]);
    let doc = LopdfDocument::open(&path, no_renderer()).unwrap();

    assert_eq!(doc.page_count(), 0);
    assert_eq!(TextDensityClassifier::default().classify(&doc), ScanVerdict::Scanned);
    assert_eq!(NativeTextSource.extract(&doc).unwrap().page_count, 0);
}

#[test]
fn test_with_pdf_returns_closure_error() {
    let (_dir, path) = pdf_with(&[CAT_PAGE]);

    let err = with_pdf(&path, no_renderer(), |doc| -> fi_pdf2en::Result<()> {
        assert_eq!(doc.page_count(), 1);
        Err(TranslatorError::Extraction {
            page: 1,
            message: "stopped".into(),
        })
    })
    .unwrap_err();

    assert!(matches!(err, TranslatorError::Extraction { page: 1, .. }));
}

#[test]
fn test_run_file_translates_native_pdf() {
    let (_dir, path) = pdf_with(&[CAT_PAGE, DOG_PAGE]);
    let model = RecordingModel::default();
    let engine = model.engine();

    let report = Pipeline::new(&engine, &UnusedOcr, PipelineOptions::default())
        .run_file(&path, no_renderer())
        .unwrap();

    assert_eq!(report.verdict, ScanVerdict::Native);
    assert_eq!(report.page_count, 2);
    assert_eq!(
        report.lines,
        vec![
            "EN: Kissa istuu matolla.",
            "EN: Se nukkuu.",
            "EN: Koira juoksee pihalla ja aurinko paistaa kirkkaasti.",
        ]
    );
    assert_eq!(model.batch_sizes(), vec![3]);
}

#[test]
fn test_run_file_on_empty_pdf_translates_nothing() {
    let (_dir, path) = pdf_with(&[]);
    let model = RecordingModel::default();
    let engine = model.engine();

    let report = Pipeline::new(&engine, &UnusedOcr, PipelineOptions::default())
        .run_file(&path, no_renderer())
        .unwrap();

    assert_eq!(report.page_count, 0);
    assert!(report.lines.is_empty());
    assert!(model.batch_sizes().is_empty());
}

#[test]
fn test_run_file_missing_input() {
    let model = RecordingModel::default();
    let engine = model.engine();

    let err = Pipeline::new(&engine, &UnusedOcr, PipelineOptions::default())
        .run_file(std::path::Path::new("/definitely/not/here.pdf"), no_renderer())
        .unwrap_err();

    assert!(matches!(err, TranslatorError::Input(_)));
}
