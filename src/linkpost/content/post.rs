// SPDX-License-Identifier: MIT

//! Post body prompts and cleanup

use super::PostBrief;
use crate::adk::generation::GenerationRequest;

/// Boilerplate the model sometimes puts in front of the post
pub const UNWANTED_PREFIXES: [&str; 5] = ["Here's", "Here is", "LinkedIn Post:", "Post:", "Draft:"];

const SYSTEM_INSTRUCTION: &str = "You write LinkedIn posts that can be pasted into LinkedIn as-is. \
No markdown, no labels, no introductions, no word counts. Short paragraphs separated by blank \
lines, at most three emojis, a hook within the first 140 characters, a closing call-to-action \
and 3-5 hashtags on the last line. Output only the post.";

pub fn request(brief: &PostBrief) -> GenerationRequest {
    let user = format!(
        "Write a LinkedIn post about: {}\n\n\
         Target audience: {}\n\
         Goal: {}\n\
         Tone: {}\n\
         Approximate length: {} words\n\
         Keywords to include: {}\n\
         Call-to-action: {}",
        brief.topic, brief.audience, brief.goal, brief.tone, brief.length, brief.keywords, brief.cta
    );

    GenerationRequest::new(SYSTEM_INSTRUCTION, user)
        .max_output_tokens(600)
        .temperature(0.7)
}

/// Case-insensitive ASCII prefix match that never splits a character
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// Trim the reply and strip boilerplate prefixes until none is left
pub fn clean_post_body(raw: &str) -> String {
    let mut post = raw.trim();

    loop {
        let before = post;
        for prefix in UNWANTED_PREFIXES {
            if let Some(rest) = strip_prefix_ignore_case(post, prefix) {
                post = rest.trim();
                if let Some(rest) = post.strip_prefix(':') {
                    post = rest.trim();
                }
            }
        }
        if post.len() == before.len() {
            break;
        }
    }

    post.to_string()
}
