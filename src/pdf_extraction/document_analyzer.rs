use super::lopdf_helper::PdfSource;
use crate::config::MIN_TEXT_CHARS;
use crate::types::ScanVerdict;

/// Decides whether a document carries selectable text or needs OCR
pub trait ScanHeuristic {
    fn classify(&self, document: &dyn PdfSource) -> ScanVerdict;
}

/// Native-text density check with early exit.
///
/// Pages are visited in order and their non-whitespace characters summed; the
/// document is `Native` as soon as the running total reaches `min_chars`.
/// Later pages are never read once that happens.
#[derive(Debug, Clone, Copy)]
pub struct TextDensityClassifier {
    pub min_chars: usize,
}

impl Default for TextDensityClassifier {
    fn default() -> Self {
        Self { min_chars: MIN_TEXT_CHARS }
    }
}

impl TextDensityClassifier {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl ScanHeuristic for TextDensityClassifier {
    fn classify(&self, document: &dyn PdfSource) -> ScanVerdict {
        classify_by_text_density(document, self.min_chars)
    }
}

pub fn classify_by_text_density(document: &dyn PdfSource, min_chars: usize) -> ScanVerdict {
    let mut total = 0;
    for page_index in 0..document.page_count() {
        let text = document.native_text(page_index).unwrap_or_default();
        total += visible_char_count(&text);
        if total >= min_chars {
            log::debug!(
                "{} visible chars after page {}, treating as native text",
                total,
                page_index + 1
            );
            return ScanVerdict::Native;
        }
    }
    log::debug!("only {} visible chars in document, treating as scanned", total);
    ScanVerdict::Scanned
}

/// Apply a caller override on top of a heuristic; forcing OCR always wins
pub fn resolve_verdict(
    heuristic: &dyn ScanHeuristic,
    document: &dyn PdfSource,
    force_ocr: bool,
) -> ScanVerdict {
    if force_ocr {
        log::debug!("OCR forced, skipping classification");
        return ScanVerdict::Scanned;
    }
    heuristic.classify(document)
}

pub fn visible_char_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
