use std::time::Instant;

use candle_core::{Device, Tensor};
use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::error::{InferenceError, Result};
use crate::model::LanguageModel;
use crate::sampling::greedy;
use crate::tokenizer::TokenizerWrapper;

pub struct GenerationOutput {
    /// Prompt plus continuation, special tokens stripped.
    pub text: String,
    /// Prompt ids followed by the generated ids.
    pub tokens: Vec<u32>,
    pub prompt_tokens: usize,
    pub new_tokens: usize,
    pub tokens_per_second: f64,
    pub total_time_ms: u128,
}

pub struct TextGenerator<'a> {
    model: &'a mut dyn LanguageModel,
    tokenizer: &'a TokenizerWrapper,
    device: &'a Device,
}

impl<'a> TextGenerator<'a> {
    pub fn new(
        model: &'a mut dyn LanguageModel,
        tokenizer: &'a TokenizerWrapper,
        device: &'a Device,
    ) -> Self {
        Self {
            model,
            tokenizer,
            device,
        }
    }

    pub fn generate(&mut self, prompt: &str, config: &GenerationConfig) -> Result<GenerationOutput> {
        let start_time = Instant::now();

        self.model.reset_cache();

        let prompt_tokens = self.tokenizer.encode(prompt)?;
        let prompt_len = prompt_tokens.len();
        info!("Prompt tokens: {}", prompt_len);

        if prompt_tokens.is_empty() {
            return Err(InferenceError::Inference("Empty prompt".to_string()));
        }

        let eos_token = self
            .tokenizer
            .eos_token_id()
            .unwrap_or_else(|| self.model.eos_token_id());

        let mut all_tokens = prompt_tokens;

        // Prefill
        let input_tensor = Tensor::new(all_tokens.as_slice(), self.device)?.unsqueeze(0)?;
        let mut logits = self.model.forward(&input_tensor, 0)?;

        let generation_start = Instant::now();

        for i in 0..config.max_new_tokens {
            let next_token = greedy(&logits)?;

            if next_token == eos_token {
                debug!("EOS generated at position {}", i);
                break;
            }

            all_tokens.push(next_token);

            if i + 1 == config.max_new_tokens {
                debug!("Generation budget of {} tokens reached", config.max_new_tokens);
                break;
            }

            let input = Tensor::new(&[next_token], self.device)?.unsqueeze(0)?;
            logits = self.model.forward(&input, prompt_len + i)?;
        }

        let generation_time = generation_start.elapsed();
        let total_time = start_time.elapsed();
        let new_tokens = all_tokens.len() - prompt_len;

        let tokens_per_second = if generation_time.as_secs_f64() > 0.0 {
            new_tokens as f64 / generation_time.as_secs_f64()
        } else {
            0.0
        };

        let output_text = self.tokenizer.decode(&all_tokens)?;

        info!(
            "Generated {} tokens in {:?} ({:.2} tokens/sec)",
            new_tokens, generation_time, tokens_per_second
        );

        Ok(GenerationOutput {
            text: output_text,
            tokens: all_tokens,
            prompt_tokens: prompt_len,
            new_tokens,
            tokens_per_second,
            total_time_ms: total_time.as_millis(),
        })
    }
}
