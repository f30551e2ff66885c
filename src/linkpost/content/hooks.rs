// SPDX-License-Identifier: MIT

//! Hook prompts and line cleanup

use crate::adk::generation::GenerationRequest;

pub const DEFAULT_HOOK_COUNT: usize = 5;
pub const HOOK_FAILURE: &str = "Hook generation failed.";

const SYSTEM_INSTRUCTION: &str = "You write opening lines for LinkedIn posts. Each hook stays \
under 140 characters, one per line, with no numbering, no quotation marks and no markdown. Mix \
questions, bold statements, statistics and story openers. Output only the hooks.";

pub fn request(topic: &str, num: usize) -> GenerationRequest {
    GenerationRequest::new(
        SYSTEM_INSTRUCTION,
        format!("Generate {} scroll-stopping hooks for a LinkedIn post about: {}", num, topic),
    )
    .max_output_tokens(300)
    .temperature(0.8)
}

fn is_marker_terminator(c: char) -> bool {
    matches!(c, '.' | ')' | ':')
}

/// Drop a leading "1." / "1)" / "1:" or the two-digit equivalent
fn strip_number_marker(line: &str) -> &str {
    let mut chars = line.chars();
    let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
        return line;
    };
    if !a.is_ascii_digit() {
        return line;
    }
    if is_marker_terminator(b) {
        return line[2..].trim();
    }
    if b.is_ascii_digit() && chars.next().is_some_and(is_marker_terminator) {
        return line[3..].trim();
    }
    line
}

/// One pass of marker, bullet and quote removal
fn strip_markers(line: &str) -> &str {
    let mut hook = line.trim();

    if hook.chars().count() > 2 {
        hook = strip_number_marker(hook);
    }

    if let Some(rest) = hook.strip_prefix('-').or_else(|| hook.strip_prefix('•')) {
        hook = rest.trim();
    }

    if hook.len() >= 2 && hook.starts_with('"') && hook.ends_with('"') {
        hook = hook[1..hook.len() - 1].trim();
    } else if hook == "\"" {
        hook = "";
    }

    hook
}

/// Clean a single hook line; returns an empty string for lines to drop.
///
/// Markers can be stacked ("- 1. Hook", "\"- Hook\""), so passes repeat
/// until the line stops changing.
fn clean_hook(line: &str) -> &str {
    let mut hook = line.trim();
    loop {
        let next = strip_markers(hook);
        if next == hook {
            return hook;
        }
        hook = next;
    }
}

/// Split the reply into lines, clean each, keep at most `num`
pub fn clean_hooks(raw: &str, num: usize) -> Vec<String> {
    raw.trim()
        .lines()
        .map(clean_hook)
        .filter(|h| !h.is_empty())
        .take(num)
        .map(str::to_string)
        .collect()
}
