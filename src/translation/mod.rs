// Local Finnish -> English translation
pub mod device;
pub mod engine;
pub mod marian;
pub mod tokenizer;

pub use device::{select_device, Accelerator, Device, DeviceProbe, OrtDeviceProbe};
pub use engine::{Seq2SeqModel, TranslationEngine};
pub use marian::{GreedySearch, MarianOnnx};
pub use tokenizer::{MarianTokenizer, SpecialTokens};
