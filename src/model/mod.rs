mod gemma;
mod loader;

pub use gemma::GemmaModel;
pub use loader::{load_model, ModelFiles};

use candle_core::Tensor;
use crate::error::Result;

/// Trait for language models that can generate next token logits
pub trait LanguageModel: Send + Sync {
    /// Forward pass to get logits for the next token
    fn forward(&mut self, input_ids: &Tensor, position: usize) -> Result<Tensor>;

    /// Reset the model's KV cache
    fn reset_cache(&mut self);

    /// Get the end-of-sequence token ID
    fn eos_token_id(&self) -> u32;
}
