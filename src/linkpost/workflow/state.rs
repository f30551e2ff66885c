// SPDX-License-Identifier: MIT

//! State threaded through the post workflow

use crate::adk::error::ValidationError;
use crate::linkpost::content::PostBrief;
use serde::{Deserialize, Serialize};

/// The generated artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub topic: String,
    pub content: String,
    pub audience: String,
    pub tone: String,
    pub hooks: Vec<String>,
    pub hashtags: Vec<String>,
}

impl PostDraft {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Mutable state owned by one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(flatten)]
    pub brief: PostBrief,
    /// Set once draft generation succeeds
    #[serde(default)]
    pub draft: Option<PostDraft>,
    /// Set by the approval checkpoint; routing never reads it
    #[serde(default)]
    pub approved: bool,
    /// Audit findings and stage failures; non-empty sends the run back to drafting
    #[serde(default)]
    pub corrections: Vec<String>,
}

impl WorkflowState {
    pub fn new(brief: PostBrief) -> Self {
        Self {
            brief,
            draft: None,
            approved: false,
            corrections: Vec::new(),
        }
    }

    /// State for a topic with default brief parameters
    pub fn for_topic(topic: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::new(PostBrief::new(topic)?))
    }

    pub fn needs_correction(&self) -> bool {
        !self.corrections.is_empty()
    }
}
