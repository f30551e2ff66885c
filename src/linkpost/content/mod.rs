// SPDX-License-Identifier: MIT

//! Content operations - post body, hooks, hashtags and carousel slides
//!
//! Every operation comes in two forms:
//! - `try_*` returns the [GenerationError], used by the workflow where a
//!   failure must become a correction
//! - the plain form never fails: errors are folded into an inline message or
//!   a fixed fallback, which is what the HTTP boundary and CLI serve

mod brief;
pub mod carousel;
pub mod hashtags;
pub mod hooks;
pub mod post;

pub use brief::{PostBrief, DEFAULT_AUDIENCE, DEFAULT_GOAL, DEFAULT_LENGTH, DEFAULT_TONE};
pub use carousel::DEFAULT_SLIDES;

use crate::adk::error::GenerationError;
use crate::adk::generation::GenerationService;
use serde::Serialize;
use std::sync::Arc;

/// Body, hooks and hashtags for one text post
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextPost {
    pub post: String,
    pub hooks: Vec<String>,
    pub hashtags: Vec<String>,
}

impl TextPost {
    /// Post, then a `Hooks:` block and a `Hashtags:` line
    pub fn render(&self) -> String {
        format!(
            "{}\n\nHooks:\n{}\n\nHashtags: {}",
            self.post,
            self.hooks.join("\n"),
            self.hashtags.join(" ")
        )
    }
}

pub struct ContentGenerator {
    service: Arc<dyn GenerationService>,
}

impl ContentGenerator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub async fn try_post_body(&self, brief: &PostBrief) -> Result<String, GenerationError> {
        let raw = self.service.generate(&post::request(brief)).await?;
        let cleaned = post::clean_post_body(&raw);
        if cleaned.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(cleaned)
    }

    /// Cleaned hooks, possibly fewer than `num` and possibly none
    pub async fn try_hooks(&self, topic: &str, num: usize) -> Result<Vec<String>, GenerationError> {
        let raw = self.service.generate(&hooks::request(topic, num)).await?;
        Ok(hooks::clean_hooks(&raw, num))
    }

    /// Extracted hashtags without the fallback applied
    pub async fn try_hashtags(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        let raw = self.service.generate(&hashtags::request(topic)).await?;
        Ok(hashtags::extract_hashtags(&raw))
    }

    pub async fn try_carousel(
        &self,
        topic: &str,
        slides: usize,
    ) -> Result<String, GenerationError> {
        let raw = self.service.generate(&carousel::request(topic, slides)).await?;
        Ok(raw.trim().to_string())
    }

    pub async fn post_body(&self, brief: &PostBrief) -> String {
        match self.try_post_body(brief).await {
            Ok(post) => post,
            Err(GenerationError::EmptyResponse) => "Error: No content generated.".to_string(),
            Err(e) => {
                log::warn!("Post generation failed for '{}': {}", brief.topic, e);
                format!("Error generating post: {}", e)
            }
        }
    }

    pub async fn hooks(&self, topic: &str, num: usize) -> Vec<String> {
        match self.try_hooks(topic, num).await {
            Ok(found) if !found.is_empty() => found,
            Ok(_) | Err(GenerationError::EmptyResponse) => vec![hooks::HOOK_FAILURE.to_string()],
            Err(e) => {
                log::warn!("Hook generation failed for '{}': {}", topic, e);
                vec![format!("Error generating hooks: {}", e)]
            }
        }
    }

    pub async fn hashtags(&self, topic: &str) -> Vec<String> {
        match self.try_hashtags(topic).await {
            Ok(found) if !found.is_empty() => found,
            Ok(_) => hashtags::fallback_hashtags(),
            Err(e) => {
                log::warn!("Hashtag generation failed for '{}': {}", topic, e);
                hashtags::fallback_hashtags()
            }
        }
    }

    pub async fn carousel(&self, topic: &str, slides: usize) -> String {
        match self.try_carousel(topic, slides).await {
            Ok(content) => content,
            Err(GenerationError::EmptyResponse) => "Error generating carousel content.".to_string(),
            Err(e) => {
                log::warn!("Carousel generation failed for '{}': {}", topic, e);
                format!("Error generating carousel: {}", e)
            }
        }
    }

    /// Body, hooks and hashtags requested concurrently
    pub async fn text_post(&self, brief: &PostBrief) -> TextPost {
        let (post, hooks, hashtags) = tokio::join!(
            self.post_body(brief),
            self.hooks(&brief.topic, hooks::DEFAULT_HOOK_COUNT),
            self.hashtags(&brief.topic),
        );
        TextPost {
            post,
            hooks,
            hashtags,
        }
    }
}
