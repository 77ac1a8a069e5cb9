// OCR engine module backed by the tesseract CLI
use image::DynamicImage;
use std::process::Command;
use tempfile::TempDir;

use crate::types::{Result, TranslatorError};

/// Image + language code -> recognized text
pub trait OcrEngine {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String>;

    /// Whether `recognize` can run at all on this machine
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    program: String,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractOcr {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        // Page number is filled in by the caller
        let fail = |message: String| TranslatorError::Extraction { page: 0, message };

        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("page.png");
        image
            .save(&image_path)
            .map_err(|e| fail(format!("cannot write page image: {}", e)))?;

        let output = Command::new(&self.program)
            .arg(&image_path)
            .arg("stdout")
            .args(["-l", language])
            .output()
            .map_err(|e| fail(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{} failed: {}", self.program, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
