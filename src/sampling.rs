use candle_core::{DType, Tensor};

use crate::error::{InferenceError, Result};

/// Picks the highest-scoring token from the last position's logits.
pub fn greedy(logits: &Tensor) -> Result<u32> {
    let logits = get_last_logits(logits)?.to_dtype(DType::F32)?;
    let logits_vec: Vec<f32> = logits.to_vec1()?;

    logits_vec
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx as u32)
        .ok_or_else(|| InferenceError::Inference("Empty logits".to_string()))
}

/// Reduces `[vocab]`, `[seq, vocab]` or `[batch, seq, vocab]` logits to the
/// final position's `[vocab]` row.
pub fn get_last_logits(logits: &Tensor) -> Result<Tensor> {
    let dims = logits.dims();
    match dims.len() {
        1 => Ok(logits.clone()),
        2 => {
            let last_idx = dims[0] - 1;
            Ok(logits.get(last_idx)?)
        }
        3 => {
            let seq_len = dims[1];
            let logits = logits.get(0)?;
            Ok(logits.get(seq_len - 1)?)
        }
        _ => Err(InferenceError::Inference(format!(
            "Unexpected logits shape {:?}",
            dims
        ))),
    }
}
