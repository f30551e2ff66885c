// SPDX-License-Identifier: MIT

use crate::adk::generation::GenerationRequest;

pub const DEFAULT_SLIDES: usize = 5;

const SYSTEM_INSTRUCTION: &str = "You write LinkedIn carousel slides ready to paste into a \
design tool. Format every slide as `SLIDE N: <title>` followed by 2-3 lines starting with `•`, \
with a blank line between slides. The first slide is a headline only, the last slide is a \
call-to-action. Titles under 10 words, bullets under 15 words, no markdown, no introduction.";

pub fn request(topic: &str, slides: usize) -> GenerationRequest {
    GenerationRequest::new(
        SYSTEM_INSTRUCTION,
        format!("Create a {}-slide LinkedIn carousel about: {}", slides, topic),
    )
    .max_output_tokens(800)
    .temperature(0.7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_mentions_slide_count() {
        let req = request("Onboarding", 7);
        assert!(req.user_instruction.starts_with("Create a 7-slide"));
        assert!(req.system_instruction.contains("SLIDE N:"));
        assert_eq!(req.max_output_tokens, 800);
    }
}
