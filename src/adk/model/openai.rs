// SPDX-License-Identifier: MIT

//! OpenAI-compatible Model - chat completions over HTTP
//!
//! OpenRouter speaks the same protocol, so the default base URL points there.

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::GenerationError;
use crate::linkpost::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

const PROVIDER: &str = "openai-compatible";
const REFERER: &str = "https://linkedin-post-generator.app";
const APP_TITLE: &str = "LinkedIn Post Generator";

/// Chat completions model implementation
pub struct OpenAIModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAIModel {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model_name: model_name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build from the resolved process configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.as_str(),
            config.model_name.clone(),
        )
    }

    /// Convert internal Content to OpenAI message format
    fn content_to_openai_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "system" => "system",
            "user" => "user",
            "model" => "assistant",
            other => other,
        };

        json!({
            "role": role,
            "content": content.text()
        })
    }

    /// Build the request body for a conversation
    fn build_body(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_openai_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
        }

        body
    }

    /// Parse OpenAI response into Content
    fn parse_openai_response(response: &serde_json::Value) -> Result<Content, GenerationError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| GenerationError::InvalidResponse("No choices in response".into()))?;

        let message = &choice["message"];
        let mut parts = Vec::new();

        if let Some(reasoning) = message["reasoning"].as_str() {
            if !reasoning.is_empty() {
                parts.push(Part::Thinking(reasoning.to_string()));
            }
        }

        if let Some(content) = message["content"].as_str() {
            if !content.is_empty() {
                parts.push(Part::Text(content.to_string()));
            }
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }

    /// Map a non-success status to a typed error
    fn status_error(status: StatusCode, retry_after: Option<u64>, text: String) -> GenerationError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Unauthorized(text),
            StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited {
                retry_after_secs: retry_after,
            },
            _ => GenerationError::api(PROVIDER, status.as_u16(), text),
        }
    }
}

#[async_trait]
impl Model for OpenAIModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(history, config);

        log::debug!(
            "Chat completion request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let text = resp.text().await?;
            log::warn!("Chat completion failed with {}: {}", status, text);
            return Err(Self::status_error(status, retry_after, text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        log::debug!("Chat completion response: {}", resp_json);

        Self::parse_openai_response(&resp_json)
    }
}
