use anyhow::{anyhow, Result};
use ndarray::{Array2, Array3};
use ort::value::Value;

use super::marian_onnx::MarianNmtOnnx;

impl MarianNmtOnnx {
    /// Run the encoder, once per request.
    ///
    /// Returns `(encoder_hidden_states, encoder_attention_mask)` with shapes
    /// `[1, seq_len, hidden]` and `[1, seq_len]`. Both stay read-only for
    /// the remainder of the decode.
    pub(crate) fn run_encoder(
        &self,
        input_ids: &[i64],
        attention_mask: &[i64],
    ) -> Result<(Array3<f32>, Array2<i64>)> {
        let batch_size = 1usize;
        let seq_len = input_ids.len();
        if attention_mask.len() != seq_len {
            return Err(anyhow!(
                "attention mask length {} does not match input length {}",
                attention_mask.len(),
                seq_len
            ));
        }

        let input_ids_value = Value::from_array((
            vec![batch_size as i64, seq_len as i64],
            input_ids.to_vec(),
        ))
        .map_err(|e| anyhow!("failed to convert input_ids to Value: {e}"))?;
        let attention_mask_value = Value::from_array((
            vec![batch_size as i64, seq_len as i64],
            attention_mask.to_vec(),
        ))
        .map_err(|e| anyhow!("failed to convert attention_mask to Value: {e}"))?;

        let mut encoder_session = self
            .encoder_session
            .lock()
            .map_err(|_| anyhow!("encoder session mutex poisoned"))?;
        let outputs = encoder_session
            .run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => attention_mask_value,
            ])
            .map_err(|e| anyhow!("failed to run encoder model: {e}"))?;

        let (shape, data) = outputs["last_hidden_state"]
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!("failed to extract encoder hidden states: {e}"))?;
        if shape.len() != 3 {
            return Err(anyhow!("unexpected encoder output rank: {shape:?}"));
        }

        let encoder_hidden_states = Array3::from_shape_vec(
            (shape[0] as usize, shape[1] as usize, shape[2] as usize),
            data.to_vec(),
        )
        .map_err(|e| anyhow!("failed to shape encoder hidden states: {e}"))?;

        let encoder_attention_mask =
            Array2::from_shape_vec((batch_size, seq_len), attention_mask.to_vec())?;

        Ok((encoder_hidden_states, encoder_attention_mask))
    }
}
