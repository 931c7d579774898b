pub mod config_manager;
pub mod error;
pub mod nmt;
pub mod onnx_utils;

pub use config_manager::{ConfigManager, EngineConfig, JsonConfigManager};
pub use error::{NmtError, NmtResult};
pub use nmt::{
    decode_greedy, DecodeLimits, DecodeOutcome, Encoded, LanguageCode, LanguagePair,
    MarianNmtOnnx, NmtTokenizer, NmtTranslator, StopReason, TranslationRequest,
    TranslationResponse,
};
