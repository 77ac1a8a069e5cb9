// Orchestrates classify -> extract -> segment -> translate
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::Settings;
use crate::pdf_extraction::{
    resolve_verdict, source_for, with_pdf, NativeTextSource, OcrEngine, OcrTextSource, PdfSource,
    ScanHeuristic, SystemPdfRenderer, TextDensityClassifier,
};
use crate::segmenter::{PunctuationSegmenter, SentenceSegmenter};
use crate::translation::TranslationEngine;
use crate::types::{ExtractedText, Result, ScanVerdict, TranslatorError};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub force_ocr: bool,
    pub min_text_chars: usize,
    pub ocr_dpi: u32,
    pub ocr_language: String,
    pub batch_size: usize,
    pub show_progress: bool,
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            force_ocr: settings.scan.prefer_ocr,
            min_text_chars: settings.scan.min_text_chars,
            ocr_dpi: settings.ocr.dpi,
            ocr_language: settings.ocr.language.clone(),
            batch_size: settings.translation.batch_size,
            show_progress: false,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Outcome of one run; `lines[i]` is the translation of `sentences[i]`
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub verdict: ScanVerdict,
    pub page_count: usize,
    pub sentences: Vec<String>,
    pub lines: Vec<String>,
}

pub struct Pipeline<'a> {
    engine: &'a TranslationEngine,
    ocr: &'a dyn OcrEngine,
    classifier: Box<dyn ScanHeuristic + 'a>,
    segmenter: Box<dyn SentenceSegmenter + 'a>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(engine: &'a TranslationEngine, ocr: &'a dyn OcrEngine, options: PipelineOptions) -> Self {
        Self {
            engine,
            ocr,
            classifier: Box::new(TextDensityClassifier::new(options.min_text_chars)),
            segmenter: Box::new(PunctuationSegmenter),
            options,
        }
    }

    pub fn with_classifier(mut self, classifier: impl ScanHeuristic + 'a) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'a) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Open `path`, extract, release the document, then translate
    pub fn run_file(&self, path: &Path, renderer: SystemPdfRenderer) -> Result<PipelineReport> {
        let (verdict, extracted) = with_pdf(path, renderer, |document| self.extract(document))?;
        self.translate(verdict, extracted)
    }

    pub fn run(&self, document: &dyn PdfSource) -> Result<PipelineReport> {
        let (verdict, extracted) = self.extract(document)?;
        self.translate(verdict, extracted)
    }

    pub fn extract(&self, document: &dyn PdfSource) -> Result<(ScanVerdict, ExtractedText)> {
        let verdict = resolve_verdict(self.classifier.as_ref(), document, self.options.force_ocr);
        log::info!("{} pages, using {} extraction", document.page_count(), verdict);

        if verdict == ScanVerdict::Scanned && document.page_count() > 0 && !self.ocr.is_available() {
            return Err(TranslatorError::Extraction {
                page: 1,
                message: "document needs OCR but the OCR engine is not available".into(),
            });
        }

        let native = NativeTextSource;
        let ocr = OcrTextSource::new(self.ocr)
            .with_dpi(self.options.ocr_dpi)
            .with_language(self.options.ocr_language.clone())
            .with_progress(self.progress_bar("pages"));

        let extracted = source_for(verdict, &native, &ocr).extract(document)?;
        Ok((verdict, extracted))
    }

    pub fn translate(&self, verdict: ScanVerdict, extracted: ExtractedText) -> Result<PipelineReport> {
        let sentences = self.segmenter.segment(&extracted.text);
        log::info!("found {} sentences", sentences.len());

        let lines = self.engine.translate_with_progress(
            &sentences,
            self.options.batch_size,
            &self.progress_bar("sentences"),
        )?;
        if lines.len() != sentences.len() {
            return Err(TranslatorError::Inference(format!(
                "{} translations for {} sentences",
                lines.len(),
                sentences.len()
            )));
        }

        Ok(PipelineReport {
            verdict,
            page_count: extracted.page_count,
            sentences,
            lines,
        })
    }

    fn progress_bar(&self, unit: &str) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} {{eta}}",
                unit
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar
    }
}
