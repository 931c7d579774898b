use std::path::Path;

use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

/// One tokenizer invocation's worth of model inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

/// Wrapper around the HuggingFace tokenizer shipped with the exported model.
///
/// Constructed once per model directory and passed by reference wherever it
/// is needed; never process-global state.
pub struct NmtTokenizer {
    tokenizer: Tokenizer,
}

impl NmtTokenizer {
    /// Load `tokenizer.json` from the model directory.
    pub fn from_model_dir(model_dir: &Path) -> Result<Self> {
        let tokenizer_path = model_dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(anyhow!(
                "tokenizer.json not found at {}. Export the tokenizer alongside the ONNX models.",
                tokenizer_path.display()
            ));
        }

        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            )
        })?;

        Ok(Self { tokenizer })
    }

    /// Tokenize source text into model inputs, special tokens included.
    pub fn encode(&self, text: &str) -> Result<Encoded> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("failed to encode text: {e}"))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        Ok(Encoded {
            input_ids,
            attention_mask,
        })
    }

    /// Detokenize generated ids back into text.
    pub fn decode(&self, ids: &[i64], skip_special_tokens: bool) -> Result<String> {
        let ids_u32: Vec<u32> = ids.iter().map(|&id| id as u32).collect();
        self.tokenizer
            .decode(&ids_u32, skip_special_tokens)
            .map_err(|e| anyhow!("failed to decode ids: {e}"))
    }
}
