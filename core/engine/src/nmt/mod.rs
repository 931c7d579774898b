pub mod decode_loop;
pub mod decoder;
pub mod encoder;
pub mod language_pair;
pub mod marian_onnx;
pub mod nmt_trait;
pub mod tokenizer;
pub mod translation;
pub mod types;

pub use decode_loop::{decode_greedy, DecodeLimits, DecodeOutcome, StopReason};
pub use language_pair::{LanguageCode, LanguagePair};
pub use marian_onnx::MarianNmtOnnx;
pub use nmt_trait::NmtTranslator;
pub use tokenizer::{Encoded, NmtTokenizer};
pub use types::{TranslationRequest, TranslationResponse};
