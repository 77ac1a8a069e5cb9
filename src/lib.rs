//! Local Finnish -> English PDF translation.
//!
//! A PDF is classified as native-text or scanned, its text is pulled out with
//! the matching strategy, split into sentences and translated in fixed-size
//! batches by a Marian model running on ONNX Runtime.

pub mod config;
pub mod output;
pub mod pdf_extraction;
pub mod pipeline;
pub mod segmenter;
pub mod translation;
pub mod types;

pub use config::Settings;
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport};
pub use translation::TranslationEngine;
pub use types::{ExtractedText, Result, ScanVerdict, TranslatorError};
