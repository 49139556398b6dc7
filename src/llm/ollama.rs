use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::llm::ChatModel;

/// Non-streaming client for Ollama's `/api/chat`.
pub struct OllamaClient {
    http: Client,
    chat_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// `timeout` of `None` lets a request block until the model answers.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Ollama")?;
        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }
}

impl ChatModel for OllamaClient {
    fn chat(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .http
            .post(&self.chat_url)
            .json(&request)
            .send()
            .with_context(|| format!("Failed to reach Ollama at {}", self.chat_url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            bail!("Ollama error ({status}): {error_text}");
        }

        let chat: ChatResponse = response
            .json()
            .context("Failed to parse Ollama response")?;
        Ok(chat.message.content)
    }
}
