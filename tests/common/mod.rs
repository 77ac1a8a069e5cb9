// Shared fakes for pipeline tests
#![allow(dead_code)]

use fi_pdf2en::pdf_extraction::{OcrEngine, PdfSource};
use fi_pdf2en::translation::{Device, Seq2SeqModel, TranslationEngine};
use fi_pdf2en::{Result, TranslatorError};
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::cell::RefCell;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// In-memory document: native text per page plus what OCR "sees" on each page
pub struct MemoryDocument {
    pub native: Vec<Option<String>>,
    pub scanned: Vec<String>,
    pub rasterized: RefCell<Vec<(usize, u32)>>,
}

impl MemoryDocument {
    pub fn native(pages: &[&str]) -> Self {
        Self {
            native: pages.iter().map(|p| Some(p.to_string())).collect(),
            scanned: pages.iter().map(|p| format!("[ocr] {p}")).collect(),
            rasterized: RefCell::new(Vec::new()),
        }
    }

    pub fn scanned(pages: &[&str]) -> Self {
        Self {
            native: vec![None; pages.len()],
            scanned: pages.iter().map(|p| p.to_string()).collect(),
            rasterized: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::native(&[])
    }
}

impl PdfSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.native.len()
    }

    fn native_text(&self, page_index: usize) -> Option<String> {
        self.native[page_index].clone()
    }

    fn raster_image(&self, page_index: usize, dpi: u32) -> Result<DynamicImage> {
        self.rasterized.borrow_mut().push((page_index, dpi));
        // Page index travels to the OCR fake as the image width
        Ok(DynamicImage::new_luma8(page_index as u32 + 1, 1))
    }
}

/// Returns the page's scripted OCR text
pub struct ScriptedOcr {
    pub pages: Vec<String>,
    pub languages: RefCell<Vec<String>>,
    pub fail_page: Option<usize>,
}

impl ScriptedOcr {
    pub fn for_document(document: &MemoryDocument) -> Self {
        Self {
            pages: document.scanned.clone(),
            languages: RefCell::new(Vec::new()),
            fail_page: None,
        }
    }
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        let page_index = image.width() as usize - 1;
        self.languages.borrow_mut().push(language.to_string());
        if self.fail_page == Some(page_index) {
            return Err(TranslatorError::Extraction { page: 0, message: "tesseract crashed".into() });
        }
        Ok(self.pages[page_index].clone())
    }
}

/// Tags each sentence with `EN:` and records batch sizes
#[derive(Clone, Default)]
pub struct RecordingModel {
    pub batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingModel {
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn engine(&self) -> TranslationEngine {
        TranslationEngine::from_model(Box::new(self.clone()), Device::GeneralPurpose)
    }
}

impl Seq2SeqModel for RecordingModel {
    fn generate(&self, batch: &[String]) -> Result<Vec<String>> {
        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(batch.iter().map(|s| format!("EN: {s}")).collect())
    }
}

/// Fails every batch as if the device ran out of memory
pub struct ExhaustedModel;

impl Seq2SeqModel for ExhaustedModel {
    fn generate(&self, batch: &[String]) -> Result<Vec<String>> {
        Err(TranslatorError::ResourceExhaustion {
            batch_size: batch.len(),
            message: "out of memory".into(),
        })
    }
}

/// Write a PDF with one line of Courier text per page (an empty string still emits a text object)
pub fn write_text_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// OCR that must never be reached
pub struct UnusedOcr;

impl OcrEngine for UnusedOcr {
    fn recognize(&self, _image: &DynamicImage, _language: &str) -> Result<String> {
        panic!("OCR invoked for a document that should not need it");
    }
}
