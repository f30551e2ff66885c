// SPDX-License-Identifier: MIT

//! Model module - defines the LLM model trait and shared conversation types
//!
//! Model implementations live in their own submodules:
//! - [openai] - any OpenAI-compatible chat completions endpoint (OpenRouter by default)

pub mod openai;

use crate::adk::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Reasoning emitted by thinking models; never shown to users
    Thinking(String),
}

impl Content {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, skipping thinking
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect()
    }
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_thinking() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Thinking("let me think".to_string()),
                Part::Text("Hello ".to_string()),
                Part::Text("world".to_string()),
            ],
        };
        assert_eq!(content.text(), "Hello world");
    }

    #[test]
    fn test_constructors_set_roles() {
        assert_eq!(Content::system("s").role, "system");
        assert_eq!(Content::user("u").role, "user");
        assert_eq!(Content::model("m").role, "model");
    }
}
