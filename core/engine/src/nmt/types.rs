use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub source_text: String,
    /// Optional sanity check against the loaded model's target language.
    pub target_language: Option<String>,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
    /// Tokens produced by the decode loop, start token excluded.
    pub token_count: usize,
}
