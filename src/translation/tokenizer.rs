// Marian tokenizer module
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::types::{Result, TranslatorError};

pub const SOURCE_TOKENIZER: &str = "tokenizer.json";
pub const TARGET_TOKENIZER: &str = "target_tokenizer.json";

const CONVERSION_HINT: &str = "convert source.spm (and target.spm) to tokenizer.json / \
target_tokenizer.json with token ids remapped to vocab.json";

type Vocab = HashMap<String, u32>;

/// Special token ids from the model's `config.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpecialTokens {
    pub decoder_start_token_id: u32,
    pub eos_token_id: u32,
    pub pad_token_id: u32,
}

impl SpecialTokens {
    pub fn load(model_dir: &Path) -> Result<Self> {
        let path = model_dir.join("config.json");
        let content = std::fs::read_to_string(&path).map_err(|e| {
            TranslatorError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            TranslatorError::ModelLoad(format!("invalid {}: {}", path.display(), e))
        })
    }
}

/// Padded, truncated token matrix for one batch, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub batch_size: usize,
    pub seq_len: usize,
}

pub struct MarianTokenizer {
    source: Tokenizer,
    target: Option<Tokenizer>,
}

impl MarianTokenizer {
    /// Load `tokenizer.json` and, when present, `target_tokenizer.json` for decoding.
    ///
    /// Both must number tokens the way the model's `vocab.json` does.
    pub fn load(model_dir: &Path, pad_id: u32, max_length: usize) -> Result<Self> {
        let vocab = load_vocab(model_dir)?;
        let mut source = load_tokenizer(model_dir, SOURCE_TOKENIZER, vocab.as_ref())?;
        let pad_token = source
            .id_to_token(pad_id)
            .unwrap_or_else(|| "<pad>".to_string());
        source.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_id,
            pad_token,
            ..Default::default()
        }));
        source
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| TranslatorError::ModelLoad(format!("truncation setup failed: {}", e)))?;

        let target = if model_dir.join(TARGET_TOKENIZER).exists() {
            Some(load_tokenizer(model_dir, TARGET_TOKENIZER, vocab.as_ref())?)
        } else {
            None
        };

        Ok(Self { source, target })
    }

    pub fn encode_batch(&self, sentences: &[String]) -> Result<EncodedBatch> {
        let encodings = self
            .source
            .encode_batch(sentences.to_vec(), true)
            .map_err(|e| TranslatorError::Inference(format!("tokenization failed: {}", e)))?;

        let batch_size = encodings.len();
        let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);
        let mut input_ids = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask = Vec::with_capacity(batch_size * seq_len);
        for encoding in &encodings {
            input_ids.extend(encoding.get_ids().iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        }

        Ok(EncodedBatch {
            input_ids,
            attention_mask,
            batch_size,
            seq_len,
        })
    }

    /// Decode generated ids, dropping special tokens
    pub fn decode_batch(&self, sequences: &[Vec<u32>]) -> Result<Vec<String>> {
        let tokenizer = self.target.as_ref().unwrap_or(&self.source);
        let slices: Vec<&[u32]> = sequences.iter().map(Vec::as_slice).collect();
        let decoded = tokenizer
            .decode_batch(&slices, true)
            .map_err(|e| TranslatorError::Inference(format!("detokenization failed: {}", e)))?;
        Ok(decoded.into_iter().map(|s| s.trim().to_string()).collect())
    }
}

fn load_tokenizer(model_dir: &Path, file: &str, vocab: Option<&Vocab>) -> Result<Tokenizer> {
    let path = model_dir.join(file);
    if !path.exists() {
        let message = if model_dir.join("source.spm").exists() {
            format!(
                "{} not found next to source.spm: {}",
                file, CONVERSION_HINT
            )
        } else {
            format!("tokenizer not found: {}", path.display())
        };
        return Err(TranslatorError::ModelLoad(message));
    }
    let tokenizer = Tokenizer::from_file(&path)
        .map_err(|e| TranslatorError::ModelLoad(format!("cannot load {}: {}", path.display(), e)))?;

    if let Some(vocab) = vocab {
        check_vocab_ids(&tokenizer, vocab)
            .map_err(|m| TranslatorError::ModelLoad(format!("{}: {}", path.display(), m)))?;
    }
    Ok(tokenizer)
}

fn load_vocab(model_dir: &Path) -> Result<Option<Vocab>> {
    let path = model_dir.join("vocab.json");
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| TranslatorError::ModelLoad(format!("invalid {}: {}", path.display(), e)))
}

// Marian's SentencePiece ids differ from the embedding ids in vocab.json
fn check_vocab_ids(tokenizer: &Tokenizer, vocab: &Vocab) -> std::result::Result<(), String> {
    let mut mismatched: Vec<(&String, u32, Option<u32>)> = vocab
        .iter()
        .filter_map(|(token, &id)| {
            let found = tokenizer.token_to_id(token);
            (found != Some(id)).then_some((token, id, found))
        })
        .collect();
    if mismatched.is_empty() {
        return Ok(());
    }
    mismatched.sort_by_key(|(_, id, _)| *id);
    let (token, expected, found) = mismatched[0];
    Err(format!(
        "{} token ids differ from vocab.json (e.g. {:?} is {:?}, vocab.json says {}); {}",
        mismatched.len(),
        token,
        found,
        expected,
        CONVERSION_HINT
    ))
}
