use anyhow::{anyhow, Result};
use ndarray::Array1;
use tracing::debug;

/// Bounds for one greedy decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Hard cap on decode steps; reaching it is a valid (if degraded) stop.
    pub max_steps: usize,
    /// How many EOS predictions, cumulative over the whole decode, are
    /// tolerated before stopping. A single EOS prediction from this model is
    /// too noisy a signal and can truncate real output.
    pub max_eos_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cumulative EOS count reached `max_eos_count` (the normal stop).
    EosThreshold,
    /// `max_steps` ran out before the threshold was reached.
    MaxSteps,
}

#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    /// `[start_token]` followed by one token per completed step.
    pub token_ids: Vec<i64>,
    pub stop_reason: StopReason,
    /// Total EOS tokens produced. Cumulative, never reset.
    pub eos_count: usize,
}

/// Greedy autoregressive decode.
///
/// `next_logits` is the external decoder capability: it receives the full
/// generated sequence so far and returns the logits for the next position.
/// Each step appends the argmax token (EOS included), and the loop stops
/// once `max_eos_count` EOS tokens have been produced in total, or after
/// `max_steps` steps. Errors from `next_logits` abort the decode.
pub fn decode_greedy<F>(
    start_token: i64,
    eos_token: i64,
    limits: DecodeLimits,
    mut next_logits: F,
) -> Result<DecodeOutcome>
where
    F: FnMut(&[i64]) -> Result<Array1<f32>>,
{
    let mut token_ids = Vec::with_capacity(limits.max_steps + 1);
    token_ids.push(start_token);

    let mut eos_count = 0usize;
    let mut stop_reason = StopReason::MaxSteps;

    for step in 0..limits.max_steps {
        let logits = next_logits(&token_ids)?;

        let next_token_id = argmax(&logits)
            .ok_or_else(|| anyhow!("decoder returned empty logits at step {step}"))?;

        token_ids.push(next_token_id);
        debug!(step, next_token_id, eos_count, "decode step");

        if next_token_id == eos_token {
            eos_count += 1;
            if eos_count >= limits.max_eos_count {
                stop_reason = StopReason::EosThreshold;
                break;
            }
        }
    }

    Ok(DecodeOutcome {
        token_ids,
        stop_reason,
        eos_count,
    })
}

/// Index of the largest logit (greedy selection, no sampling).
pub(crate) fn argmax(logits: &Array1<f32>) -> Option<i64> {
    logits
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx as i64)
}
