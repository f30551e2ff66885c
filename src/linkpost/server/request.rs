// SPDX-License-Identifier: MIT

//! Request bodies accepted by the HTTP boundary

use crate::adk::error::ValidationError;
use crate::linkpost::content::{PostBrief, DEFAULT_SLIDES};
use serde::Deserialize;
use std::str::FromStr;

pub const DEFAULT_TEMPLATE: &str = "personal_story";

fn default_post_type() -> String {
    "text".to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostType {
    Text,
    Carousel,
    Template,
}

impl FromStr for PostType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "carousel" => Ok(Self::Carousel),
            "template" => Ok(Self::Template),
            _ => Err(ValidationError::InvalidPostType(s.to_string())),
        }
    }
}

/// `"150-200"` or `150`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Text(String),
    Number(serde_json::Number),
}

impl Length {
    fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// `"a, b"` or `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    Joined(String),
    List(Vec<String>),
}

impl Keywords {
    /// Non-blank keywords joined with ", "
    pub fn joined(&self) -> String {
        let parts: Vec<&str> = match self {
            Self::Joined(s) => s.split(',').collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        parts
            .into_iter()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub length: Option<Length>,
    #[serde(default)]
    pub keywords: Option<Keywords>,
    #[serde(default)]
    pub cta: String,
    #[serde(default = "default_template")]
    pub template_name: String,
    #[serde(default)]
    pub slides: Option<usize>,
}

impl GenerateRequest {
    pub fn post_type(&self) -> Result<PostType, ValidationError> {
        self.post_type.parse()
    }

    /// Brief with blank fields defaulted; a blank topic is rejected
    pub fn brief(&self) -> Result<PostBrief, ValidationError> {
        Ok(PostBrief::new(self.topic.as_str())?
            .audience(self.audience.as_str())
            .goal(self.goal.as_str())
            .tone(self.tone.as_str())
            .length(self.length.as_ref().map(Length::as_text).unwrap_or_default())
            .keywords(self.keywords.as_ref().map(Keywords::joined).unwrap_or_default())
            .cta(self.cta.as_str()))
    }

    pub fn slides(&self) -> usize {
        self.slides.filter(|n| *n > 0).unwrap_or(DEFAULT_SLIDES)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub post: String,
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = parse(json!({"topic": "Hiring"}));
        assert_eq!(req.post_type().unwrap(), PostType::Text);
        assert_eq!(req.template_name, "personal_story");
        assert_eq!(req.slides(), 5);

        let brief = req.brief().unwrap();
        assert_eq!(brief.audience, "professionals");
        assert_eq!(brief.length, "150-200");
        assert_eq!(brief.keywords, "");
    }

    #[test]
    fn test_length_string_or_number() {
        assert_eq!(parse(json!({"topic": "x", "length": 150})).brief().unwrap().length, "150");
        assert_eq!(
            parse(json!({"topic": "x", "length": "100-120"})).brief().unwrap().length,
            "100-120"
        );
    }

    #[test]
    fn test_keywords_string_or_list() {
        let req = parse(json!({"topic": "x", "keywords": "ai, ,  product ,teams"}));
        assert_eq!(req.brief().unwrap().keywords, "ai, product, teams");

        let req = parse(json!({"topic": "x", "keywords": ["ai", " product", ""]}));
        assert_eq!(req.brief().unwrap().keywords, "ai, product");
    }

    #[test]
    fn test_blank_topic_rejected() {
        let req = parse(json!({"topic": "   "}));
        assert_eq!(req.brief(), Err(ValidationError::MissingTopic));
    }

    #[test]
    fn test_unknown_post_type() {
        let req = parse(json!({"post_type": "video"}));
        assert_eq!(
            req.post_type(),
            Err(ValidationError::InvalidPostType("video".into()))
        );
    }

    #[test]
    fn test_schedule_timezone_default() {
        let req: ScheduleRequest =
            serde_json::from_value(json!({"post": "p", "time": "2030-01-01 09:00"})).unwrap();
        assert_eq!(req.timezone, "UTC");
    }
}
