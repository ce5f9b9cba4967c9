//! Completion service abstraction
//!
//! A single non-streaming chat-completion call against an OpenAI-style
//! endpoint. One attempt per request, no retries: a retry would double-bill
//! the upstream service, and the orchestrator treats any failure as fatal
//! for that request anyway.

use crate::config::CompletionConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

/// Trait for text completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and return the completion text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// OpenAI-style completion client
pub struct OpenAiCompletion {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompletion {
    /// Build a client from configuration. The API key and base URL are
    /// injected here, never read from ambient globals at call time.
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Configuration {
                message: "completion.api_key is required for the openai provider".to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            client,
            api_key,
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CompletionService { status, body });
        }

        let result: ChatCompletionResponse =
            response.json().await.map_err(AppError::HttpClient)?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "No response generated".to_string());

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock completion client for testing: returns a canned response and
/// records every prompt it receives.
pub struct MockCompletion {
    response: Result<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock that fails every call with a completion-service error
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            response: Err(AppError::CompletionService {
                status,
                body: body.to_string(),
            }),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far (call-count assertion hook for tests)
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(AppError::CompletionService { status, body }) => {
                Err(AppError::CompletionService {
                    status: *status,
                    body: body.clone(),
                })
            }
            Err(_) => Err(AppError::Internal {
                message: "mock misconfigured".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "mock-completion"
    }
}

/// Create a completion client based on configuration
pub fn create_completion_client(config: &CompletionConfig) -> Result<Arc<dyn CompletionClient>> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiCompletion::new(config)?)),
        "mock" => Ok(Arc::new(MockCompletion::new("mock response"))),
        other => {
            tracing::warn!(provider = other, "Unknown completion provider, using mock");
            Ok(Arc::new(MockCompletion::new("mock response")))
        }
    }
}
