#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use candle_core::{Device, Tensor};
use gemma_generate::api::AppState;
use gemma_generate::error::{InferenceError, Result};
use gemma_generate::model::LanguageModel;
use gemma_generate::tokenizer::TokenizerWrapper;

pub const VOCAB_SIZE: usize = 14;
pub const EOS: u32 = 1;
const FIRST_WORD: u32 = 4;
const LAST_WORD: u32 = 13;

#[derive(Clone, Copy)]
pub enum Script {
    /// Walks the fixture vocabulary in order and emits `<eos>` after "dog".
    Sentence,
    /// Walks the vocabulary forever, wrapping from "dog" back to "Hello".
    Endless,
    /// Every forward pass fails.
    Broken,
}

/// Deterministic stand-in for a real checkpoint.
pub struct ScriptedModel {
    script: Script,
    pub resets: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn next_token(&self, last: u32) -> u32 {
        match (self.script, last) {
            (Script::Sentence, LAST_WORD) => EOS,
            (Script::Endless, LAST_WORD) => FIRST_WORD,
            (_, id) if (FIRST_WORD..LAST_WORD).contains(&id) => id + 1,
            _ => 6,
        }
    }
}

impl LanguageModel for ScriptedModel {
    fn forward(&mut self, input_ids: &Tensor, _position: usize) -> Result<Tensor> {
        if let Script::Broken = self.script {
            return Err(InferenceError::Inference("scripted failure".to_string()));
        }

        let ids: Vec<u32> = input_ids.squeeze(0)?.to_vec1()?;
        let last = *ids
            .last()
            .ok_or_else(|| InferenceError::Inference("no input".to_string()))?;

        let mut logits = vec![0f32; VOCAB_SIZE];
        logits[self.next_token(last) as usize] = 10.0;
        Ok(Tensor::from_vec(logits, (1, 1, VOCAB_SIZE), &Device::Cpu)?)
    }

    fn reset_cache(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn eos_token_id(&self) -> u32 {
        EOS
    }
}

pub fn fixture_tokenizer() -> TokenizerWrapper {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tokenizer.json");
    TokenizerWrapper::load(&path).expect("fixture tokenizer should load")
}

pub fn test_state(script: Script) -> Arc<AppState> {
    Arc::new(AppState::new(
        Box::new(ScriptedModel::new(script)),
        fixture_tokenizer(),
        Device::Cpu,
        "test/scripted",
    ))
}
