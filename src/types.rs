// Core types and error enum for fi-pdf2en
use std::fmt;

/// Which text source a document was routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Native,
    Scanned,
}

impl fmt::Display for ScanVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanVerdict::Native => write!(f, "native text"),
            ScanVerdict::Scanned => write!(f, "scanned"),
        }
    }
}

/// Whole-document text in page order, pages joined by a blank line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

impl ExtractedText {
    pub const PAGE_SEPARATOR: &'static str = "\n\n";

    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len();
        Self {
            text: pages.join(Self::PAGE_SEPARATOR),
            page_count,
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Extraction failed on page {page}: {message}")]
    Extraction { page: usize, message: String },

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Device memory exhausted on a batch of {batch_size} sentences: {message}")]
    ResourceExhaustion { batch_size: usize, message: String },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
