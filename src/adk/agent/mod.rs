// SPDX-License-Identifier: MIT

//! Agent module - role agents for multi-party exchanges
//!
//! An agent is one role (critic, moderator, ...) bound to a model and a
//! system instruction. Each `run` is a single generation call.

mod llm;

pub use llm::LLMAgent;

use crate::adk::error::GenerationError;
use async_trait::async_trait;

/// Core agent trait for all agent types
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent name
    fn name(&self) -> &str;

    /// Run the agent with the given input
    async fn run(&self, input: String) -> Result<String, GenerationError>;
}
