// SPDX-License-Identifier: MIT

//! Generation service - one system instruction, one user instruction, one text reply

use crate::adk::error::GenerationError;
use crate::adk::model::{Content, GenerationConfig, Model};
use async_trait::async_trait;
use std::sync::Arc;

/// A single-shot generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_instruction: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(system_instruction: impl Into<String>, user_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_instruction: user_instruction.into(),
            max_output_tokens: 600,
            temperature: 0.7,
        }
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text generation contract used by every content operation.
///
/// Implementations return trimmed, non-empty text. An answer without text is
/// [GenerationError::EmptyResponse], never an empty string.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Generation service backed by a conversational [Model]
pub struct ModelGenerationService {
    model: Arc<dyn Model>,
}

impl ModelGenerationService {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl GenerationService for ModelGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let history = [
            Content::system(request.system_instruction.as_str()),
            Content::user(request.user_instruction.as_str()),
        ];
        let config = GenerationConfig {
            temperature: Some(request.temperature),
            max_output_tokens: Some(request.max_output_tokens),
            top_p: None,
        };

        let response = self.model.generate_content(&history, Some(&config)).await?;
        let text = response.text();
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the history and config it was called with
    struct RecordingModel {
        reply: String,
        seen: Mutex<Option<(Vec<Content>, GenerationConfig)>>,
    }

    #[async_trait]
    impl Model for RecordingModel {
        async fn generate_content(
            &self,
            history: &[Content],
            config: Option<&GenerationConfig>,
        ) -> Result<Content, GenerationError> {
            let config = config.cloned().unwrap_or_default();
            *self.seen.lock().unwrap() = Some((history.to_vec(), config));
            Ok(Content::model(self.reply.as_str()))
        }
    }

    fn service(reply: &str) -> (ModelGenerationService, Arc<RecordingModel>) {
        let model = Arc::new(RecordingModel {
            reply: reply.to_string(),
            seen: Mutex::new(None),
        });
        (ModelGenerationService::new(model.clone()), model)
    }

    #[tokio::test]
    async fn test_generate_passes_instructions_and_config() {
        let (svc, model) = service("  done  ");
        let request = GenerationRequest::new("be brief", "say hi")
            .max_output_tokens(100)
            .temperature(0.5);

        let text = svc.generate(&request).await.unwrap();
        assert_eq!(text, "done");

        let (history, config) = model.seen.lock().unwrap().clone().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "system");
        assert_eq!(history[0].text(), "be brief");
        assert_eq!(history[1].text(), "say hi");
        assert_eq!(config.max_output_tokens, Some(100));
        assert_eq!(config.temperature, Some(0.5));
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_response() {
        let (svc, _) = service("   \n ");
        let err = svc
            .generate(&GenerationRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("a", "b");
        assert_eq!(request.max_output_tokens, 600);
        assert_eq!(request.temperature, 0.7);
    }
}
