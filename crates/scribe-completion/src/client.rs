use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::error::CompletionError;

// Sampling parameters are fixed for every request.
pub const MAX_TOKENS: u32 = 300;
pub const TEMPERATURE: f32 = 0.6;
pub const TOP_P: f32 = 0.9;
pub const FREQUENCY_PENALTY: f32 = 0.5;
pub const PRESENCE_PENALTY: f32 = 0.5;

#[derive(Debug, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Wraps a topic in the blog-post instruction sent to the model.
pub fn blog_post_instruction(topic: &str) -> String {
    format!(
        "Write a detailed, well-structured blog post about the following topic: {}. \
         Avoid repetition and be clear and informative.",
        topic
    )
}

/// Blocking-per-call client: one outbound POST per [`complete`](Self::complete),
/// bounded by the configured timeout, never retried.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn request_for(&self, topic: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            prompt: blog_post_instruction(topic),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        }
    }

    /// Ask the service to write about `topic` and return the first choice's
    /// text with surrounding whitespace trimmed.
    pub async fn complete(&self, topic: &str) -> Result<String, CompletionError> {
        let request = self.request_for(topic);

        let response = self
            .http
            .post(&self.config.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(response = %body, "Completion response");
        first_choice_text(&body)
    }
}

fn first_choice_text(body: &str) -> Result<String, CompletionError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text.trim().to_string())
        .ok_or_else(|| CompletionError::MalformedResponse("no choices returned".into()))
}
