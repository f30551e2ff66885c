// SPDX-License-Identifier: MIT

//! LLM Agent - one role, one system instruction, one model call per run

use super::Agent;
use crate::adk::error::GenerationError;
use crate::adk::model::{Content, GenerationConfig, Model};
use async_trait::async_trait;
use std::sync::Arc;

/// Role agent backed by an LLM
pub struct LLMAgent {
    pub name: String,
    pub instruction: String,
    pub model: Arc<dyn Model>,
    pub config: GenerationConfig,
}

impl LLMAgent {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: Arc<dyn Model>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            model,
            config: GenerationConfig {
                temperature: Some(0.7),
                max_output_tokens: Some(400),
                top_p: None,
            },
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl Agent for LLMAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: String) -> Result<String, GenerationError> {
        let history = [Content::system(self.instruction.as_str()), Content::user(input)];

        let response = self
            .model
            .generate_content(&history, Some(&self.config))
            .await?;

        let text = response.text();
        let text = text.trim();
        if text.is_empty() {
            log::warn!("Agent {} received an empty response", self.name);
            return Err(GenerationError::EmptyResponse);
        }

        log::info!(
            "Agent {} returning text response (length: {}, preview: '{}')",
            self.name,
            text.len(),
            text.chars().take(100).collect::<String>()
        );
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Model for FixedModel {
        async fn generate_content(
            &self,
            history: &[Content],
            _config: Option<&GenerationConfig>,
        ) -> Result<Content, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(history[0].role, "system");
            assert_eq!(history[1].role, "user");
            Ok(Content::model(self.reply))
        }
    }

    #[tokio::test]
    async fn test_run_returns_trimmed_text() {
        let model = Arc::new(FixedModel {
            reply: "  Too many buzzwords.\n",
            calls: AtomicUsize::new(0),
        });
        let agent = LLMAgent::new("Critic", "You critique posts.", model.clone());

        let out = agent.run("Draft text".to_string()).await.unwrap();
        assert_eq!(out, "Too many buzzwords.");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(agent.name(), "Critic");
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let model = Arc::new(FixedModel {
            reply: "",
            calls: AtomicUsize::new(0),
        });
        let agent = LLMAgent::new("Moderator", "You moderate.", model);

        let err = agent.run("anything".to_string()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
