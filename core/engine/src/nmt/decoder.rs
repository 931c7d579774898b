use anyhow::{anyhow, Result};
use ndarray::{Array1, Array2, Array3};
use ort::value::Value;

use super::marian_onnx::MarianNmtOnnx;

impl MarianNmtOnnx {
    /// One decoder inference over the whole generated prefix.
    ///
    /// This export carries no KV cache: every step re-runs the full prefix,
    /// and only the last position's distribution is consulted.
    pub(crate) fn decoder_logits(
        &self,
        generated_ids: &[i64],
        encoder_attention_mask: &Array2<i64>,
        encoder_hidden_states: &Array3<f32>,
    ) -> Result<Array1<f32>> {
        let batch_size = 1usize;
        let tgt_len = generated_ids.len();

        let input_ids_value = Value::from_array((
            vec![batch_size as i64, tgt_len as i64],
            generated_ids.to_vec(),
        ))
        .map_err(|e| anyhow!("failed to convert decoder input_ids to Value: {e}"))?;

        let mask_shape: Vec<i64> = encoder_attention_mask
            .shape()
            .iter()
            .map(|&d| d as i64)
            .collect();
        let mask_value = Value::from_array((
            mask_shape,
            encoder_attention_mask.iter().copied().collect::<Vec<i64>>(),
        ))
        .map_err(|e| anyhow!("failed to convert encoder_attention_mask to Value: {e}"))?;

        let hidden_shape: Vec<i64> = encoder_hidden_states
            .shape()
            .iter()
            .map(|&d| d as i64)
            .collect();
        let hidden_value = Value::from_array((
            hidden_shape,
            encoder_hidden_states.iter().copied().collect::<Vec<f32>>(),
        ))
        .map_err(|e| anyhow!("failed to convert encoder_hidden_states to Value: {e}"))?;

        let mut decoder_session = self
            .decoder_session
            .lock()
            .map_err(|_| anyhow!("decoder session mutex poisoned"))?;
        let outputs = decoder_session
            .run(ort::inputs![
                "input_ids" => input_ids_value,
                "encoder_attention_mask" => mask_value,
                "encoder_hidden_states" => hidden_value,
            ])
            .map_err(|e| anyhow!("failed to run decoder model: {e}"))?;

        // logits: [1, tgt_len, vocab]
        let (shape, data) = outputs["logits"]
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!("failed to extract logits: {e}"))?;
        if shape.len() != 3 {
            return Err(anyhow!("unexpected logits rank: {shape:?}"));
        }

        let positions = shape[1] as usize;
        let vocab_size = shape[2] as usize;
        if positions == 0 || vocab_size == 0 || data.len() < positions * vocab_size {
            return Err(anyhow!("decoder returned empty logits"));
        }

        let last = &data[(positions - 1) * vocab_size..positions * vocab_size];
        Ok(Array1::from_vec(last.to_vec()))
    }
}
