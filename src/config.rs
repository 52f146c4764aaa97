use clap::Parser;

use crate::error::{InferenceError, Result};

/// Number of new tokens each generation may produce beyond the prompt.
pub const MAX_NEW_TOKENS: usize = 50;

pub const DEFAULT_MODEL_ID: &str = "google/gemma-2b-it";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Gemma text-generation HTTP service")]
pub struct Args {
    #[arg(short, long, env = "MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model: String,

    #[arg(long, default_value = "main")]
    pub revision: String,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long)]
    pub cpu: bool,

    /// Hugging Face access token used to fetch the model artifacts
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: String,

    /// Run a single generation, print it and exit instead of serving
    #[arg(short, long)]
    pub prompt: Option<String>,
}

impl Args {
    /// Returns the registry credential, rejecting an empty value.
    pub fn credential(&self) -> Result<&str> {
        let token = self.hf_token.trim();
        if token.is_empty() {
            return Err(InferenceError::Config("HF_TOKEN is set but empty".to_string()));
        }
        Ok(token)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub max_new_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
        }
    }
}
