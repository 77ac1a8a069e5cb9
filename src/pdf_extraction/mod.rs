// PDF extraction module
pub mod document_analyzer;
pub mod extraction_router;
pub mod lopdf_helper;
pub mod ocr_engine;
pub mod system_pdf_renderer;

pub use document_analyzer::{classify_by_text_density, resolve_verdict, ScanHeuristic, TextDensityClassifier};
pub use extraction_router::{source_for, NativeTextSource, OcrTextSource, PageTextSource};
pub use lopdf_helper::{load_pdf, with_pdf, LopdfDocument, PdfSource};
pub use ocr_engine::{OcrEngine, TesseractOcr};
pub use system_pdf_renderer::SystemPdfRenderer;
