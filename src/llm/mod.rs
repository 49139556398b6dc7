//! Language-model side of the scan: the chat boundary, the prompt, and the
//! YES/NO classifier built on them.

pub mod classifier;
pub mod ollama;
mod prompts;

use anyhow::Result;

/// A single blocking chat turn.
pub trait ChatModel {
    fn chat(&self, model: &str, prompt: &str) -> Result<String>;
}

pub use classifier::{Classification, Classifier};
pub use ollama::OllamaClient;
