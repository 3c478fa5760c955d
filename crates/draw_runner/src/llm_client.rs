use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(String),
    #[error("ollama error: {0}")]
    Service(String),
    #[error("empty response")]
    EmptyResponse,
    #[error("mock responses exhausted")]
    MockExhausted,
}

pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: &req.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };
        debug!("[llm] generate model={} prompt_chars={}", self.model, req.prompt.len());
        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .timeout(req.timeout)
            .send()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(LlmError::Service(format!("{status} {text}")));
        }
        let parsed: GenerateResponse = resp.json().map_err(|e| LlmError::Http(e.to_string()))?;
        let content = parsed
            .response
            .filter(|s| !s.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;
        Ok(LlmResponse { content })
    }

    /// Liveness check against `GET /api/tags`.
    pub fn ping(&self) -> Result<(), LlmError> {
        let resp = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(LlmError::Service(resp.status().to_string()))
        }
    }
}

pub struct MockLlm {
    responses: Mutex<VecDeque<String>>,
}

impl MockLlm {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    pub fn complete(&self, _req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut guard = self
            .responses
            .lock()
            .map_err(|_| LlmError::MockExhausted)?;
        let content = guard.pop_front().ok_or(LlmError::MockExhausted)?;
        Ok(LlmResponse { content })
    }
}

pub enum LlmClient {
    Ollama(OllamaClient),
    Mock(MockLlm),
}

impl LlmClient {
    pub fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        match self {
            LlmClient::Ollama(client) => client.complete(req),
            LlmClient::Mock(client) => client.complete(req),
        }
    }

    pub fn ping(&self) -> Result<(), LlmError> {
        match self {
            LlmClient::Ollama(client) => client.ping(),
            LlmClient::Mock(_) => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}
