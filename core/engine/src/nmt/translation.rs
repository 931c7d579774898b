use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::decode_loop::{decode_greedy, DecodeLimits, StopReason};
use super::language_pair::LanguageCode;
use super::marian_onnx::MarianNmtOnnx;
use super::nmt_trait::NmtTranslator;
use super::types::{TranslationRequest, TranslationResponse};
use crate::error::{NmtError, NmtResult};

impl MarianNmtOnnx {
    /// Full translation path: tokenize, one encoder pass, greedy decode,
    /// detokenize with special tokens skipped.
    pub fn translate(&self, source_text: &str) -> Result<String> {
        Ok(self.translate_with_count(source_text)?.0)
    }

    /// Like `translate`, also returning how many tokens the decode produced
    /// (start token excluded, EOS tokens included).
    pub fn translate_with_count(&self, source_text: &str) -> Result<(String, usize)> {
        // empty source: defined as an empty translation, no model calls
        if source_text.trim().is_empty() {
            return Ok((String::new(), 0));
        }

        let encoded = self
            .tokenizer
            .encode(source_text)
            .with_context(|| "failed to tokenize source text")?;
        debug!(input_len = encoded.input_ids.len(), "source tokenized");

        let (encoder_hidden_states, encoder_attention_mask) =
            self.run_encoder(&encoded.input_ids, &encoded.attention_mask)?;
        debug!(shape = ?encoder_hidden_states.shape(), "encoder pass done");

        let limits = DecodeLimits {
            max_steps: self.max_steps,
            max_eos_count: self.max_eos_count,
        };
        let outcome = decode_greedy(
            self.decoder_start_token_id,
            self.eos_token_id,
            limits,
            |generated_ids| {
                self.decoder_logits(generated_ids, &encoder_attention_mask, &encoder_hidden_states)
            },
        )?;

        if outcome.stop_reason == StopReason::MaxSteps {
            debug!(
                max_steps = self.max_steps,
                "decode hit the step bound before the EOS threshold"
            );
        }
        info!(
            generated = outcome.token_ids.len(),
            eos_count = outcome.eos_count,
            "decode finished"
        );

        // drop the start token; the tokenizer skips EOS/pad on its own
        let token_count = outcome.token_ids.len() - 1;
        let translated_text = self.tokenizer.decode(&outcome.token_ids[1..], true)?;
        Ok((translated_text, token_count))
    }

    /// Translate several passages in order, one request each.
    pub fn translate_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        texts.iter().map(|text| self.translate(text.as_ref())).collect()
    }
}

#[async_trait]
impl NmtTranslator for MarianNmtOnnx {
    async fn initialize(&self) -> NmtResult<()> {
        // sessions are loaded in new_from_dir; nothing left to warm up
        Ok(())
    }

    async fn translate(&self, request: TranslationRequest) -> NmtResult<TranslationResponse> {
        if let (Some(requested), Some(pair)) =
            (request.target_language.as_deref(), self.language_pair())
        {
            let code: LanguageCode = requested
                .parse()
                .map_err(|e: anyhow::Error| NmtError::from(e))?;
            if code != pair.target {
                return Err(NmtError::new(format!(
                    "model translates {pair}, not into {code}"
                )));
            }
        }

        let (translated_text, token_count) = self
            .translate_with_count(&request.source_text)
            .map_err(|e| NmtError::new(format!("translation failed: {e:#}")))?;

        Ok(TranslationResponse {
            translated_text,
            token_count,
        })
    }

    async fn finalize(&self) -> NmtResult<()> {
        Ok(())
    }
}
