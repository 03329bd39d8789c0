use crate::config::GenerationConfig;
use crate::describe::SYSTEM_PROMPT;
use crate::error::{KgdescError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces one description per prompt.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Chat message in OpenAI-compatible format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request structure for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response structure from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat completions endpoint
///
/// Handles retry with exponential backoff on rate limits and server errors.
pub struct ChatClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: usize,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the service
    /// * `config` - Endpoint, model and sampling settings
    pub fn new(api_key: String, config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KgdescError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: completions_endpoint(&config.base_url),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        })
    }

    /// Single API request, no retry
    async fn complete_once(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| KgdescError::Generation(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(KgdescError::Generation(format!(
                "API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| KgdescError::Generation(format!("Failed to parse response: {}", e)))?;

        first_choice(result)
    }
}

#[async_trait]
impl DescriptionGenerator for ChatClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.complete_once(prompt).await {
                Ok(content) => {
                    log::debug!(
                        "Chat completion took {:?} (attempt {})",
                        start.elapsed(),
                        attempt + 1
                    );
                    return Ok(content);
                }
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    log::warn!("Retry {}/{} after error: {}", attempt + 1, self.max_retries, e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn completions_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or_else(|| KgdescError::Generation("No choices in response".to_string()))
}

/// Rate limits (429), server errors (5xx) and network failures are retried.
fn is_retryable(err: &KgdescError) -> bool {
    match err {
        KgdescError::Generation(msg) => {
            msg.starts_with("Network error")
                || msg
                    .strip_prefix("API error ")
                    .and_then(|rest| rest.get(..3))
                    .and_then(|code| code.parse::<u16>().ok())
                    .is_some_and(|code| code == 429 || (500..600).contains(&code))
        }
        _ => false,
    }
}
