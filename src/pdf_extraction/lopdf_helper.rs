// lopdf helper - Pure Rust PDF operations
use image::DynamicImage;
use lopdf::Document;
use std::path::{Path, PathBuf};

use super::system_pdf_renderer::SystemPdfRenderer;
use crate::types::{Result, TranslatorError};

/// Page-level view of an opened PDF.
///
/// Page indices are 0-based. `raster_image` renders on demand and is never cached.
pub trait PdfSource {
    fn page_count(&self) -> usize;

    /// Selectable text of a page, `None` when the page has none or it cannot be read
    fn native_text(&self, page_index: usize) -> Option<String>;

    fn raster_image(&self, page_index: usize, dpi: u32) -> Result<DynamicImage>;
}

pub struct LopdfDocument {
    path: PathBuf,
    document: Document,
    page_numbers: Vec<u32>,
    renderer: SystemPdfRenderer,
}

impl LopdfDocument {
    pub fn open(path: &Path, renderer: SystemPdfRenderer) -> Result<Self> {
        let document = load_pdf(path)?;
        // get_pages is keyed by 1-based page number in document order
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(Self {
            path: path.to_path_buf(),
            document,
            page_numbers,
            renderer,
        })
    }
}

impl PdfSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn native_text(&self, page_index: usize) -> Option<String> {
        let page_number = *self.page_numbers.get(page_index)?;
        match self.document.extract_text(&[page_number]) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                log::debug!("no native text on page {}: {}", page_number, e);
                None
            }
        }
    }

    fn raster_image(&self, page_index: usize, dpi: u32) -> Result<DynamicImage> {
        let page_number = self.page_numbers.get(page_index).ok_or_else(|| {
            TranslatorError::Extraction {
                page: page_index + 1,
                message: format!("page {} not found", page_index + 1),
            }
        })?;
        self.renderer.render_page(&self.path, *page_number, dpi)
    }
}

/// Load a PDF document using lopdf
pub fn load_pdf(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(TranslatorError::Input(format!(
            "input PDF not found: {}",
            path.display()
        )));
    }
    Document::load(path).map_err(|e| {
        TranslatorError::Input(format!("cannot read PDF {}: {}", path.display(), e))
    })
}

/// Execute an operation with a PDF document.
///
/// The document is dropped before the closure's result, success or error, is returned.
pub fn with_pdf<F, R>(path: &Path, renderer: SystemPdfRenderer, f: F) -> Result<R>
where
    F: FnOnce(&LopdfDocument) -> Result<R>,
{
    let document = LopdfDocument::open(path, renderer)?;
    let result = f(&document);
    drop(document);
    log::debug!("released {}", path.display());
    result
}
