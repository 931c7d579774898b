use anyhow::{anyhow, Result};
use std::sync::OnceLock;

static ORT_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialize the global ONNX Runtime environment. Every code path that
/// creates an ORT session must call this first; only the first call commits,
/// and its outcome is latched so a failed init keeps failing for later
/// callers instead of being swallowed.
pub fn init_onnx_runtime() -> Result<()> {
    let result = ORT_INIT.get_or_init(|| {
        ort::init()
            .commit()
            .map(|_| ())
            .map_err(|e| format!("failed to init ONNX Runtime: {e}"))
    });

    match result {
        Ok(()) => Ok(()),
        Err(e) => Err(anyhow!("{e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_latches_first_outcome() {
        let first = init_onnx_runtime().is_ok();
        let second = init_onnx_runtime().is_ok();
        assert_eq!(first, second);
    }
}
