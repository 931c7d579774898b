use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use ort::session::Session;
use tracing::{debug, info, warn};

use super::language_pair::LanguagePair;
use super::tokenizer::NmtTokenizer;
use crate::config_manager::EngineConfig;

const DEFAULT_MAX_EOS_COUNT: usize = 8;

/// Generation constants read from the model's `config.json`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GenerationConfig {
    pub decoder_start_token_id: i64,
    pub eos_token_id: i64,
    pub pad_token_id: i64,
    pub max_steps: usize,
}

impl Default for GenerationConfig {
    /// OPUS-MT ja-en constants, used when config.json is absent.
    /// Marian decoding starts from <pad>, and </s> doubles as BOS/EOS (id 0).
    fn default() -> Self {
        Self {
            decoder_start_token_id: 60715,
            eos_token_id: 0,
            pad_token_id: 60715,
            max_steps: 50,
        }
    }
}

impl GenerationConfig {
    /// Missing token-id fields fall back to the ja-en defaults; a present
    /// but malformed `max_length` (negative, fractional, or not fitting in
    /// usize) is rejected rather than silently replaced.
    pub(crate) fn from_json(config: &serde_json::Value) -> Result<Self> {
        let defaults = Self::default();

        let max_steps = match config.get("max_length") {
            None | Some(serde_json::Value::Null) => defaults.max_steps,
            Some(value) => {
                let n = value.as_u64().ok_or_else(|| {
                    anyhow!("config.json max_length must be a non-negative integer, got {value}")
                })?;
                usize::try_from(n)
                    .map_err(|_| anyhow!("config.json max_length {n} does not fit in usize"))?
            }
        };

        Ok(Self {
            decoder_start_token_id: config["decoder_start_token_id"]
                .as_i64()
                .unwrap_or(defaults.decoder_start_token_id),
            eos_token_id: config["eos_token_id"]
                .as_i64()
                .unwrap_or(defaults.eos_token_id),
            pad_token_id: config["pad_token_id"]
                .as_i64()
                .unwrap_or(defaults.pad_token_id),
            max_steps,
        })
    }
}

/// Marian/OPUS-MT translation model exported to ONNX: one encoder session,
/// one decoder session, the tokenizer shipped with the export, and the
/// generation constants read from `config.json`.
///
/// The sessions are mutex-guarded: an ORT run needs exclusive access to its
/// session, and one translator may sit behind concurrent async callers.
pub struct MarianNmtOnnx {
    pub(crate) encoder_session: Mutex<Session>,
    pub(crate) decoder_session: Mutex<Session>,
    pub(crate) tokenizer: NmtTokenizer,
    pub(crate) decoder_start_token_id: i64,
    pub(crate) eos_token_id: i64,
    pub(crate) pad_token_id: i64,
    pub(crate) max_steps: usize,
    pub(crate) max_eos_count: usize,
    pub(crate) language_pair: Option<LanguagePair>,
}

impl MarianNmtOnnx {
    /// Load a translator from a model directory.
    ///
    /// # Files Required
    /// - `encoder_model.onnx`
    /// - `decoder_model.onnx`
    /// - `tokenizer.json`
    /// - `config.json` (optional; ja-en defaults apply when absent)
    pub fn new_from_dir(model_dir: &Path) -> Result<Self> {
        crate::onnx_utils::init_onnx_runtime()?;

        let tokenizer = NmtTokenizer::from_model_dir(model_dir)?;

        let encoder_path = model_dir.join("encoder_model.onnx");
        if !encoder_path.exists() {
            return Err(anyhow!(
                "encoder_model.onnx not found at {}",
                encoder_path.display()
            ));
        }
        let encoder_session = Session::builder()
            .map_err(|e| anyhow!("failed to create encoder Session builder: {e}"))?
            .commit_from_file(&encoder_path)
            .map_err(|e| {
                anyhow!(
                    "failed to load encoder ONNX model from {}: {e}",
                    encoder_path.display()
                )
            })?;
        info!("encoder model loaded: {}", encoder_path.display());

        let decoder_path = model_dir.join("decoder_model.onnx");
        if !decoder_path.exists() {
            return Err(anyhow!(
                "decoder_model.onnx not found at {}",
                decoder_path.display()
            ));
        }
        let decoder_session = Session::builder()
            .map_err(|e| anyhow!("failed to create decoder Session builder: {e}"))?
            .commit_from_file(&decoder_path)
            .map_err(|e| {
                anyhow!(
                    "failed to load decoder ONNX model from {}: {e}",
                    decoder_path.display()
                )
            })?;
        info!("decoder model loaded: {}", decoder_path.display());

        for (i, input) in decoder_session.inputs.iter().enumerate() {
            debug!("decoder input[{i}] name={:?}", input.name);
        }
        for (i, output) in decoder_session.outputs.iter().enumerate() {
            debug!("decoder output[{i}] name={:?}", output.name);
        }

        // This engine drives the plain (non KV-cache) export: the decoder
        // takes the whole prefix each step and exactly these three inputs.
        let actual_inputs = decoder_session.inputs.len();
        if actual_inputs != 3 {
            return Err(anyhow!(
                "decoder model has {actual_inputs} inputs, expected 3 \
                (input_ids, encoder_attention_mask, encoder_hidden_states); \
                re-export the decoder without past_key_values"
            ));
        }

        let config_path = model_dir.join("config.json");
        let generation = if config_path.exists() {
            let config_str = fs::read_to_string(&config_path)
                .map_err(|e| anyhow!("failed to read config.json: {e}"))?;
            let config: serde_json::Value = serde_json::from_str(&config_str)
                .map_err(|e| anyhow!("failed to parse config.json: {e}"))?;
            GenerationConfig::from_json(&config)?
        } else {
            warn!(
                "config.json not found in {}; using OPUS-MT ja-en defaults",
                model_dir.display()
            );
            GenerationConfig::default()
        };

        let language_pair = LanguagePair::from_model_dir(model_dir).ok();
        if let Some(pair) = language_pair {
            info!("model language pair: {pair}");
        }

        Ok(Self {
            encoder_session: Mutex::new(encoder_session),
            decoder_session: Mutex::new(decoder_session),
            tokenizer,
            decoder_start_token_id: generation.decoder_start_token_id,
            eos_token_id: generation.eos_token_id,
            pad_token_id: generation.pad_token_id,
            max_steps: generation.max_steps,
            max_eos_count: DEFAULT_MAX_EOS_COUNT,
            language_pair,
        })
    }

    /// Load a translator and take the decode bounds from an `EngineConfig`
    /// instead of the model's `config.json`.
    pub fn new_from_config(config: &EngineConfig) -> Result<Self> {
        let mut translator = Self::new_from_dir(&config.model_dir)?;
        translator.max_steps = config.max_steps;
        translator.max_eos_count = config.max_eos_count;
        Ok(translator)
    }

    pub fn decoder_start_token_id(&self) -> i64 {
        self.decoder_start_token_id
    }

    pub fn eos_token_id(&self) -> i64 {
        self.eos_token_id
    }

    pub fn pad_token_id(&self) -> i64 {
        self.pad_token_id
    }

    pub fn tokenizer(&self) -> &NmtTokenizer {
        &self.tokenizer
    }

    pub fn language_pair(&self) -> Option<LanguagePair> {
        self.language_pair
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationConfig;
    use serde_json::json;

    #[test]
    fn empty_config_uses_defaults() {
        let parsed = GenerationConfig::from_json(&json!({})).unwrap();
        assert_eq!(parsed.decoder_start_token_id, 60715);
        assert_eq!(parsed.eos_token_id, 0);
        assert_eq!(parsed.pad_token_id, 60715);
        assert_eq!(parsed.max_steps, 50);
    }

    #[test]
    fn config_fields_override_defaults() {
        let parsed = GenerationConfig::from_json(&json!({
            "decoder_start_token_id": 2,
            "eos_token_id": 1,
            "pad_token_id": 3,
            "max_length": 128,
        }))
        .unwrap();
        assert_eq!(parsed.decoder_start_token_id, 2);
        assert_eq!(parsed.eos_token_id, 1);
        assert_eq!(parsed.pad_token_id, 3);
        assert_eq!(parsed.max_steps, 128);
    }

    #[test]
    fn null_max_length_uses_default() {
        let parsed = GenerationConfig::from_json(&json!({ "max_length": null })).unwrap();
        assert_eq!(parsed.max_steps, 50);
    }

    #[test]
    fn negative_max_length_is_rejected() {
        let err = GenerationConfig::from_json(&json!({ "max_length": -1 })).unwrap_err();
        assert!(err.to_string().contains("max_length"));
    }

    #[test]
    fn fractional_max_length_is_rejected() {
        assert!(GenerationConfig::from_json(&json!({ "max_length": 50.5 })).is_err());
    }

    #[test]
    fn non_numeric_max_length_is_rejected() {
        assert!(GenerationConfig::from_json(&json!({ "max_length": "50" })).is_err());
    }
}
