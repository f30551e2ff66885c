// SPDX-License-Identifier: MIT

use crate::adk::error::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIENCE: &str = "professionals";
pub const DEFAULT_GOAL: &str = "educate";
pub const DEFAULT_TONE: &str = "professional";
pub const DEFAULT_LENGTH: &str = "150-200";

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_goal() -> String {
    DEFAULT_GOAL.to_string()
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_length() -> String {
    DEFAULT_LENGTH.to_string()
}

/// Blank input falls back to the default
fn or_default(value: impl Into<String>, default: &str) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// What a post should be about and for whom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostBrief {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_goal")]
    pub goal: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Free-form word range, e.g. "150-200"
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub cta: String,
}

impl PostBrief {
    /// A brief with default parameters. The topic must not be blank.
    pub fn new(topic: impl Into<String>) -> Result<Self, ValidationError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(ValidationError::MissingTopic);
        }

        Ok(Self {
            topic,
            audience: default_audience(),
            goal: default_goal(),
            tone: default_tone(),
            length: default_length(),
            keywords: String::new(),
            cta: String::new(),
        })
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = or_default(audience, DEFAULT_AUDIENCE);
        self
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = or_default(goal, DEFAULT_GOAL);
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = or_default(tone, DEFAULT_TONE);
        self
    }

    pub fn length(mut self, length: impl Into<String>) -> Self {
        self.length = or_default(length, DEFAULT_LENGTH);
        self
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into().trim().to_string();
        self
    }

    pub fn cta(mut self, cta: impl Into<String>) -> Self {
        self.cta = cta.into().trim().to_string();
        self
    }

    /// Re-apply trimming and defaults, e.g. after deserializing blank fields
    pub fn normalized(self) -> Result<Self, ValidationError> {
        Ok(Self::new(self.topic)?
            .audience(self.audience)
            .goal(self.goal)
            .tone(self.tone)
            .length(self.length)
            .keywords(self.keywords)
            .cta(self.cta))
    }
}
