// SPDX-License-Identifier: MIT

//! Critique dialogue between a critic and a moderator

use crate::adk::agent::{Agent, LLMAgent};
use crate::adk::error::GenerationError;
use crate::adk::model::Model;
use crate::linkpost::workflow::state::PostDraft;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_MAX_ROUNDS: usize = 3;

/// Moderator replies starting with this marker close the debate
pub const CONSENSUS_MARKER: &str = "CONSENSUS";

const CRITIC_INSTRUCTION: &str = "You are a demanding LinkedIn editor. Read the draft and the \
discussion so far, then name the weakest parts of the post and propose concrete improvements. \
Be brief.";

const MODERATOR_INSTRUCTION: &str = "You moderate a review of a LinkedIn post draft. Weigh the \
critic's points against the draft. If the draft is good enough to publish, start your reply with \
CONSENSUS and summarize the agreed changes. Otherwise state which points still need work.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebateTurn {
    pub speaker: String,
    pub message: String,
}

pub struct Debate {
    critic: Arc<dyn Agent>,
    moderator: Arc<dyn Agent>,
    max_rounds: usize,
}

impl Debate {
    pub fn new(critic: Arc<dyn Agent>, moderator: Arc<dyn Agent>) -> Self {
        Self {
            critic,
            moderator,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Critic and moderator sharing one model
    pub fn with_model(model: Arc<dyn Model>) -> Self {
        Self::new(
            Arc::new(LLMAgent::new("critic", CRITIC_INSTRUCTION, model.clone())),
            Arc::new(LLMAgent::new("moderator", MODERATOR_INSTRUCTION, model)),
        )
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Opening message for a draft, or for its absence
    pub fn opening(draft: Option<&PostDraft>) -> String {
        let content = draft.map(|d| d.content.as_str()).unwrap_or("No draft");
        format!(
            "Debate the quality of this LinkedIn post draft: {}. Suggest improvements.",
            content
        )
    }

    /// Run up to `max_rounds` critic/moderator exchanges.
    ///
    /// Each agent sees the opening plus every turn so far. Stops early when
    /// the moderator reply starts with [CONSENSUS_MARKER].
    pub async fn run(&self, opening: &str) -> Result<Vec<DebateTurn>, GenerationError> {
        let mut turns: Vec<DebateTurn> = Vec::new();

        for round in 1..=self.max_rounds {
            for agent in [&self.critic, &self.moderator] {
                let message = agent.run(render_transcript(opening, &turns)).await?;
                turns.push(DebateTurn {
                    speaker: agent.name().to_string(),
                    message,
                });
            }

            let closed = turns
                .last()
                .map(|t| t.message.trim_start().starts_with(CONSENSUS_MARKER))
                .unwrap_or(false);
            if closed {
                log::info!("Debate reached consensus in round {}", round);
                break;
            }
        }

        Ok(turns)
    }
}

/// Opening followed by `speaker: message` blocks
pub fn render_transcript(opening: &str, turns: &[DebateTurn]) -> String {
    let mut transcript = opening.to_string();
    for turn in turns {
        transcript.push_str("\n\n");
        transcript.push_str(&turn.speaker);
        transcript.push_str(": ");
        transcript.push_str(&turn.message);
    }
    transcript
}
