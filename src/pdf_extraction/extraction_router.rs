// Routes a document to native text or OCR extraction
use indicatif::ProgressBar;

use super::lopdf_helper::PdfSource;
use super::ocr_engine::OcrEngine;
use crate::config::{OCR_DPI, OCR_LANGUAGE};
use crate::types::{ExtractedText, Result, ScanVerdict, TranslatorError};

/// "Get text for every page" strategy
pub trait PageTextSource {
    fn extract(&self, document: &dyn PdfSource) -> Result<ExtractedText>;
}

/// Selectable text; a page without any contributes an empty string
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeTextSource;

impl PageTextSource for NativeTextSource {
    fn extract(&self, document: &dyn PdfSource) -> Result<ExtractedText> {
        let pages = (0..document.page_count())
            .map(|page_index| document.native_text(page_index).unwrap_or_default())
            .collect();
        Ok(ExtractedText::from_pages(pages))
    }
}

/// Rasterize each page and run OCR on it.
///
/// The first page that fails to render or recognize aborts extraction.
pub struct OcrTextSource<'a> {
    engine: &'a dyn OcrEngine,
    dpi: u32,
    language: String,
    progress: ProgressBar,
}

impl<'a> OcrTextSource<'a> {
    pub fn new(engine: &'a dyn OcrEngine) -> Self {
        Self {
            engine,
            dpi: OCR_DPI,
            language: OCR_LANGUAGE.to_string(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }
}

impl PageTextSource for OcrTextSource<'_> {
    fn extract(&self, document: &dyn PdfSource) -> Result<ExtractedText> {
        let page_count = document.page_count();
        self.progress.set_length(page_count as u64);

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            let page = page_index + 1;
            let image = document
                .raster_image(page_index, self.dpi)
                .map_err(|e| at_page(e, page))?;
            let text = self
                .engine
                .recognize(&image, &self.language)
                .map_err(|e| at_page(e, page))?;
            log::debug!("OCR page {}/{}: {} chars", page, page_count, text.chars().count());
            pages.push(text);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        Ok(ExtractedText::from_pages(pages))
    }
}

fn at_page(error: TranslatorError, page: usize) -> TranslatorError {
    match error {
        TranslatorError::Extraction { message, .. } => TranslatorError::Extraction { page, message },
        TranslatorError::Io(e) => TranslatorError::Extraction { page, message: e.to_string() },
        other => other,
    }
}

/// Pick the extraction strategy for a verdict
pub fn source_for<'a>(
    verdict: ScanVerdict,
    native: &'a NativeTextSource,
    ocr: &'a OcrTextSource<'a>,
) -> &'a dyn PageTextSource {
    match verdict {
        ScanVerdict::Native => native,
        ScanVerdict::Scanned => ocr,
    }
}
