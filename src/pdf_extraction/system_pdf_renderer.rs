// System PDF renderer using pdftoppm
use image::DynamicImage;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use crate::types::{Result, TranslatorError};

#[derive(Debug, Clone)]
pub struct SystemPdfRenderer {
    program: String,
}

impl Default for SystemPdfRenderer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl SystemPdfRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Render one page (1-based `page_number`) to an image at `dpi`
    pub fn render_page(&self, pdf_path: &Path, page_number: u32, dpi: u32) -> Result<DynamicImage> {
        let fail = |message: String| TranslatorError::Extraction {
            page: page_number as usize,
            message,
        };

        log::trace!("rendering page {} of {} at {} dpi", page_number, pdf_path.display(), dpi);

        let temp_dir = TempDir::new()?;
        let output_prefix = temp_dir.path().join("page");

        let output = Command::new(&self.program)
            .arg("-png")
            .args(["-r", &dpi.to_string()])
            .args(["-f", &page_number.to_string()])
            .args(["-l", &page_number.to_string()])
            .arg("-singlefile")
            .arg(pdf_path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| fail(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{} failed: {}", self.program, stderr.trim())));
        }

        // -singlefile writes <prefix>.png without a page suffix
        let output_file = output_prefix.with_extension("png");
        let image = image::open(&output_file)
            .map_err(|e| fail(format!("cannot load rendered page {:?}: {}", output_file, e)))?;

        log::trace!("page {} rendered: {}x{}", page_number, image.width(), image.height());
        Ok(image)
    }
}
