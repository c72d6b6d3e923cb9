use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url, config.model
            ),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        // The key goes in a header so it never shows up in URLs or error messages
        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AppError::Llm(e.to_string()))?;

        let json: serde_json::Value = res.json().await.map_err(|e| AppError::Llm(e.to_string()))?;
        let reply = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))?
            .to_string();

        debug!(chars = reply.len(), "Received generated text");
        Ok(reply)
    }
}
