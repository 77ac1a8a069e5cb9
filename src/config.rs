// Configuration constants and settings for fi-pdf2en
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Result, TranslatorError};

// Classification
pub const MIN_TEXT_CHARS: usize = 50;

// OCR
pub const OCR_DPI: u32 = 300;
pub const OCR_LANGUAGE: &str = "fin";

// Translation
pub const MODEL_ID: &str = "Helsinki-NLP/opus-mt-fi-en";
pub const BATCH_SIZE: usize = 8;
pub const MAX_LENGTH: usize = 512;
pub const INTRA_THREADS: usize = 4;

// Output
pub const OUTPUT_PATH: &str = "translation.txt";

pub const MODELS_DIR_ENV: &str = "FIPDF_MODELS_DIR";

/// Get models directory from environment, `./models`, or the user data dir
pub fn models_dir() -> PathBuf {
    if let Ok(dir) = env::var(MODELS_DIR_ENV) {
        return dir.into();
    }
    let local = PathBuf::from("models");
    if local.is_dir() {
        return local;
    }
    dirs::data_local_dir()
        .map(|d| d.join("fi-pdf2en").join("models"))
        .unwrap_or(local)
}

/// Resolve a model identifier to a directory on disk.
///
/// An identifier naming an existing directory is used as-is, anything else
/// (e.g. `Helsinki-NLP/opus-mt-fi-en`) is looked up under `models_dir`.
pub fn resolve_model_dir(model: &str, models_dir: &Path) -> PathBuf {
    let direct = Path::new(model);
    if direct.is_dir() {
        return direct.to_path_buf();
    }
    models_dir.join(model)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub translation: TranslationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    #[serde(default)]
    pub prefer_ocr: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub device: DevicePreference,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_min_text_chars() -> usize { MIN_TEXT_CHARS }
fn default_dpi() -> u32 { OCR_DPI }
fn default_language() -> String { OCR_LANGUAGE.to_string() }
fn default_tesseract() -> String { "tesseract".to_string() }
fn default_pdftoppm() -> String { "pdftoppm".to_string() }
fn default_model() -> String { MODEL_ID.to_string() }
fn default_batch_size() -> usize { BATCH_SIZE }
fn default_max_length() -> usize { MAX_LENGTH }
fn default_intra_threads() -> usize { INTRA_THREADS }

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            prefer_ocr: false,
        }
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            language: default_language(),
            tesseract: default_tesseract(),
            pdftoppm: default_pdftoppm(),
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            models_dir: None,
            batch_size: default_batch_size(),
            max_length: default_max_length(),
            device: DevicePreference::Auto,
            intra_threads: default_intra_threads(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TranslatorError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.translation.batch_size == 0 {
            return Err(TranslatorError::Config("batch_size must be at least 1".into()));
        }
        if self.translation.max_length == 0 {
            return Err(TranslatorError::Config("max_length must be at least 1".into()));
        }
        if self.ocr.dpi == 0 {
            return Err(TranslatorError::Config("dpi must be at least 1".into()));
        }
        Ok(())
    }

    pub fn model_dir(&self) -> PathBuf {
        let root = self
            .translation
            .models_dir
            .clone()
            .unwrap_or_else(models_dir);
        resolve_model_dir(&self.translation.model, &root)
    }
}
