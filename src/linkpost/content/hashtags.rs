// SPDX-License-Identifier: MIT

//! Hashtag prompts and extraction

use crate::adk::generation::GenerationRequest;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_HASHTAGS: usize = 7;
pub const FALLBACK_HASHTAGS: [&str; 3] = ["#LinkedIn", "#Networking", "#CareerGrowth"];

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));

const SYSTEM_INSTRUCTION: &str = "You pick LinkedIn hashtags. Return 5-7 hashtags on one line, \
separated by spaces, each starting with # and containing no spaces. Mix broad and niche tags. \
No explanations.";

pub fn request(topic: &str) -> GenerationRequest {
    GenerationRequest::new(
        SYSTEM_INSTRUCTION,
        format!("Generate 5-7 LinkedIn hashtags for a post about: {}", topic),
    )
    .max_output_tokens(100)
    .temperature(0.5)
}

/// Every `#word` token in the reply, at most [MAX_HASHTAGS]
pub fn extract_hashtags(raw: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(raw)
        .map(|m| m.as_str())
        .filter(|tag| tag.chars().count() > 1)
        .take(MAX_HASHTAGS)
        .map(str::to_string)
        .collect()
}

pub fn fallback_hashtags() -> Vec<String> {
    FALLBACK_HASHTAGS.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_noisy_reply() {
        let raw = "Sure! #ProductManagement #AI, #Leadership\nand #Startups.";
        assert_eq!(
            extract_hashtags(raw),
            vec!["#ProductManagement", "#AI", "#Leadership", "#Startups"]
        );
    }

    #[test]
    fn test_truncates_to_seven() {
        let raw = "#a1 #b2 #c3 #d4 #e5 #f6 #g7 #h8 #i9";
        assert_eq!(extract_hashtags(raw).len(), 7);
        assert_eq!(extract_hashtags(raw).last().unwrap(), "#g7");
    }

    #[test]
    fn test_bare_hash_is_ignored() {
        assert!(extract_hashtags("# # #").is_empty());
        assert!(extract_hashtags("no tags here").is_empty());
    }

    #[test]
    fn test_unicode_word_characters() {
        assert_eq!(extract_hashtags("#Führung #日本"), vec!["#Führung", "#日本"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let raw = "#Remote#Work, #async_first and #FutureOfWork!!";
        let once = extract_hashtags(raw);
        let twice = extract_hashtags(&once.join(" "));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fallback_triple() {
        assert_eq!(
            fallback_hashtags(),
            vec!["#LinkedIn", "#Networking", "#CareerGrowth"]
        );
    }
}
