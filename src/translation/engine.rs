use indicatif::ProgressBar;
use std::path::Path;

use super::device::{select_device, Device, DeviceProbe, OrtDeviceProbe};
use super::marian::MarianOnnx;
use crate::config::TranslationSettings;
use crate::types::{Result, TranslatorError};

/// Batch of source strings -> batch of target strings, same order and length
pub trait Seq2SeqModel: Send + Sync {
    fn generate(&self, batch: &[String]) -> Result<Vec<String>>;
}

/// Loaded model plus the device it runs on.
///
/// Built once per run and read-only afterwards; `translate` takes `&self` and
/// can be shared across threads.
pub struct TranslationEngine {
    model: Box<dyn Seq2SeqModel>,
    device: Device,
}

impl TranslationEngine {
    pub fn initialize(model_dir: &Path, settings: &TranslationSettings) -> Result<Self> {
        Self::initialize_with_probe(model_dir, settings, &OrtDeviceProbe)
    }

    pub fn initialize_with_probe(
        model_dir: &Path,
        settings: &TranslationSettings,
        probe: &dyn DeviceProbe,
    ) -> Result<Self> {
        let device = select_device(probe, settings.device);
        log::info!("translation model: {} on {}", settings.model, device);

        let model = MarianOnnx::load(model_dir, device, settings.max_length, settings.intra_threads)?;
        Ok(Self::from_model(Box::new(model), device))
    }

    pub fn from_model(model: Box<dyn Seq2SeqModel>, device: Device) -> Self {
        Self { model, device }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn translate(&self, sentences: &[String], batch_size: usize) -> Result<Vec<String>> {
        self.translate_with_progress(sentences, batch_size, &ProgressBar::hidden())
    }

    /// Translate in contiguous chunks of at most `batch_size`, one model call each
    pub fn translate_with_progress(
        &self,
        sentences: &[String],
        batch_size: usize,
        progress: &ProgressBar,
    ) -> Result<Vec<String>> {
        if batch_size == 0 {
            return Err(TranslatorError::Config("batch size must be at least 1".into()));
        }

        progress.set_length(sentences.len() as u64);
        let mut translated = Vec::with_capacity(sentences.len());

        for (index, batch) in sentences.chunks(batch_size).enumerate() {
            let output = self.model.generate(batch)?;
            if output.len() != batch.len() {
                return Err(TranslatorError::Inference(format!(
                    "batch {} returned {} translations for {} sentences",
                    index,
                    output.len(),
                    batch.len()
                )));
            }
            log::debug!("batch {}: {} sentences", index, batch.len());
            translated.extend(output);
            progress.inc(batch.len() as u64);
        }
        progress.finish_and_clear();

        Ok(translated)
    }
}
