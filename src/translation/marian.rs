// Marian seq2seq translation over ONNX Runtime
use ndarray::ArrayView3;
use ort::{
    inputs,
    session::builder::GraphOptimizationLevel,
    session::Session,
    value::Tensor,
};
use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;

use super::device::Device;
use super::engine::Seq2SeqModel;
use super::tokenizer::{MarianTokenizer, SpecialTokens};
use crate::types::{Result, TranslatorError};

pub const ENCODER_FILE: &str = "encoder_model.onnx";
pub const DECODER_FILE: &str = "decoder_model.onnx";

/// Greedy decoding state for one batch.
///
/// Every row starts with the decoder start token. Rows that produced EOS are
/// fed padding until the whole batch is finished or `max_length` is reached.
#[derive(Debug, Clone)]
pub struct GreedySearch {
    sequences: Vec<Vec<u32>>,
    finished: Vec<bool>,
    tokens: SpecialTokens,
    max_length: usize,
}

impl GreedySearch {
    pub fn new(batch_size: usize, tokens: SpecialTokens, max_length: usize) -> Self {
        Self {
            sequences: vec![vec![tokens.decoder_start_token_id]; batch_size],
            finished: vec![false; batch_size],
            tokens,
            max_length,
        }
    }

    pub fn is_done(&self) -> bool {
        self.finished.iter().all(|&f| f) || self.current_len() >= self.max_length
    }

    pub fn current_len(&self) -> usize {
        self.sequences.first().map(Vec::len).unwrap_or(0)
    }

    /// Row-major `[batch, current_len]` decoder input ids
    pub fn decoder_input_ids(&self) -> Vec<i64> {
        self.sequences
            .iter()
            .flat_map(|seq| seq.iter().map(|&id| id as i64))
            .collect()
    }

    /// Append the next token per row from `[batch, steps, vocab]` logits
    pub fn step(&mut self, logits: ArrayView3<'_, f32>) {
        let last = logits.shape()[1].saturating_sub(1);
        for (row, seq) in self.sequences.iter_mut().enumerate() {
            if self.finished[row] {
                seq.push(self.tokens.pad_token_id);
                continue;
            }
            let scores = logits.slice(ndarray::s![row, last, ..]);
            let next = argmax_excluding(scores.iter().copied(), self.tokens.pad_token_id)
                .unwrap_or(self.tokens.eos_token_id);
            seq.push(next);
            if next == self.tokens.eos_token_id {
                self.finished[row] = true;
            }
        }
    }

    /// Generated ids per row without the start token
    pub fn into_sequences(self) -> Vec<Vec<u32>> {
        self.sequences
            .into_iter()
            .map(|mut seq| {
                seq.remove(0);
                seq
            })
            .collect()
    }
}

// First maximal index wins on ties
fn argmax_excluding(scores: impl Iterator<Item = f32>, banned: u32) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for (id, score) in scores.enumerate() {
        let id = id as u32;
        if id == banned || score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((id, score)),
        }
    }
    best.map(|(id, _)| id)
}

pub struct MarianOnnx {
    encoder: Mutex<Session>,
    decoder: Mutex<Session>,
    tokenizer: MarianTokenizer,
    tokens: SpecialTokens,
    max_length: usize,
}

impl MarianOnnx {
    pub fn load(model_dir: &Path, device: Device, max_length: usize, intra_threads: usize) -> Result<Self> {
        if !model_dir.is_dir() {
            return Err(TranslatorError::ModelLoad(format!(
                "model directory not found: {} (export the model with `optimum-cli export onnx`, then convert source.spm/target.spm to tokenizer.json/target_tokenizer.json with ids from vocab.json)",
                model_dir.display()
            )));
        }

        let _ = ort::init().with_name("fi-pdf2en").commit();

        let tokens = SpecialTokens::load(model_dir)?;
        let tokenizer = MarianTokenizer::load(model_dir, tokens.pad_token_id, max_length)?;

        log::info!("loading Marian encoder/decoder from {}", model_dir.display());
        let encoder = build_session(&model_dir.join(ENCODER_FILE), device, intra_threads)?;
        let decoder = build_session(&model_dir.join(DECODER_FILE), device, intra_threads)?;

        Ok(Self {
            encoder: Mutex::new(encoder),
            decoder: Mutex::new(decoder),
            tokenizer,
            tokens,
            max_length,
        })
    }

    fn encode(&self, input_ids: &[i64], attention_mask: &[i64], batch: usize, seq_len: usize) -> Result<(Vec<f32>, usize)> {
        let fail = |e: &dyn Display| inference_error(e, batch);

        let mut encoder = self
            .encoder
            .lock()
            .map_err(|_| TranslatorError::Inference("encoder session poisoned".into()))?;
        let ids = Tensor::from_array(([batch, seq_len], input_ids.to_vec().into_boxed_slice()))
            .map_err(|e| fail(&e))?;
        let mask = Tensor::from_array(([batch, seq_len], attention_mask.to_vec().into_boxed_slice()))
            .map_err(|e| fail(&e))?;

        let outputs = encoder
            .run(inputs![
                "input_ids" => ids,
                "attention_mask" => mask
            ])
            .map_err(|e| fail(&e))?;

        // last_hidden_state: [batch, seq_len, hidden]
        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| fail(&e))?;
        let hidden_dim = shape.get(2).copied().unwrap_or(0) as usize;
        Ok((data.to_vec(), hidden_dim))
    }
}

impl Seq2SeqModel for MarianOnnx {
    fn generate(&self, batch: &[String]) -> Result<Vec<String>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = self.tokenizer.encode_batch(batch)?;
        let (rows, seq_len) = (encoded.batch_size, encoded.seq_len);
        let fail = |e: &dyn Display| inference_error(e, rows);

        let (hidden, hidden_dim) =
            self.encode(&encoded.input_ids, &encoded.attention_mask, rows, seq_len)?;

        let mut search = GreedySearch::new(rows, self.tokens, self.max_length);
        let mut decoder = self
            .decoder
            .lock()
            .map_err(|_| TranslatorError::Inference("decoder session poisoned".into()))?;

        while !search.is_done() {
            let steps = search.current_len();
            let input_ids = Tensor::from_array(([rows, steps], search.decoder_input_ids().into_boxed_slice()))
                .map_err(|e| fail(&e))?;
            let mask = Tensor::from_array(([rows, seq_len], encoded.attention_mask.clone().into_boxed_slice()))
                .map_err(|e| fail(&e))?;
            let states = Tensor::from_array(([rows, seq_len, hidden_dim], hidden.clone().into_boxed_slice()))
                .map_err(|e| fail(&e))?;

            let outputs = decoder
                .run(inputs![
                    "input_ids" => input_ids,
                    "encoder_attention_mask" => mask,
                    "encoder_hidden_states" => states
                ])
                .map_err(|e| fail(&e))?;

            let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| fail(&e))?;
            let dims = (shape[0] as usize, shape[1] as usize, shape[2] as usize);
            let logits = ArrayView3::from_shape(dims, data).map_err(|e| fail(&e))?;
            search.step(logits);
        }
        drop(decoder);

        log::trace!("decoded {} rows in {} steps", rows, search.current_len());
        self.tokenizer.decode_batch(&search.into_sequences())
    }
}

fn build_session(path: &Path, device: Device, intra_threads: usize) -> Result<Session> {
    if !path.exists() {
        return Err(TranslatorError::ModelLoad(format!("model file not found: {}", path.display())));
    }
    let load = |e: &dyn Display| TranslatorError::ModelLoad(format!("{}: {}", path.display(), e));

    Session::builder()
        .map_err(|e| load(&e))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| load(&e))?
        .with_intra_threads(intra_threads)
        .map_err(|e| load(&e))?
        .with_execution_providers(device.execution_providers())
        .map_err(|e| load(&e))?
        .commit_from_file(path)
        .map_err(|e| load(&e))
}

/// Allocation failures become `ResourceExhaustion`, anything else `Inference`
pub fn inference_error(error: &dyn Display, batch_size: usize) -> TranslatorError {
    let message = error.to_string();
    let lower = message.to_lowercase();
    let exhausted = ["out of memory", "failed to allocate", "bad_alloc", "cudaerrormemoryallocation"]
        .iter()
        .any(|needle| lower.contains(needle));
    if exhausted {
        TranslatorError::ResourceExhaustion { batch_size, message }
    } else {
        TranslatorError::Inference(message)
    }
}
