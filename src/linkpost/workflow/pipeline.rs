// SPDX-License-Identifier: MIT

//! Wiring of the post workflow
//!
//! ```text
//! collect_input -> generate_draft -> debate_draft -> human_approval -> self_correction
//!                        ^                                                  |
//!                        +------------- corrections non-empty --------------+
//!                                                                           v
//!                                                                 finalize -> END
//! ```

use crate::adk::error::WorkflowError;
use crate::linkpost::content::ContentGenerator;
use crate::linkpost::workflow::approval::ApprovalGate;
use crate::linkpost::workflow::debate::Debate;
use crate::linkpost::workflow::engine::{RetryPolicy, StateGraph, END};
use crate::linkpost::workflow::sink::OutputSink;
use crate::linkpost::workflow::stages::{
    CollectInput, DebateDraft, Finalize, GenerateDraft, HumanApproval, SelfCorrection,
};
use crate::linkpost::workflow::state::WorkflowState;
use std::sync::Arc;

pub const COLLECT_INPUT: &str = "collect_input";
pub const GENERATE_DRAFT: &str = "generate_draft";
pub const DEBATE_DRAFT: &str = "debate_draft";
pub const HUMAN_APPROVAL: &str = "human_approval";
pub const SELF_CORRECTION: &str = "self_correction";
pub const FINALIZE: &str = "finalize";

/// Collaborators the stages need
pub struct PostWorkflowDeps {
    pub content: Arc<ContentGenerator>,
    pub debate: Debate,
    pub approval: Arc<dyn ApprovalGate>,
    pub sink: Arc<dyn OutputSink>,
    pub policy: RetryPolicy,
}

/// Back to drafting while corrections are pending, otherwise finalize
pub fn route_after_audit(state: &WorkflowState) -> &'static str {
    if state.needs_correction() {
        GENERATE_DRAFT
    } else {
        FINALIZE
    }
}

pub fn build_post_workflow(deps: PostWorkflowDeps) -> Result<StateGraph, WorkflowError> {
    let mut graph = StateGraph::with_policy(deps.policy);

    graph
        .register_stage(COLLECT_INPUT, Arc::new(CollectInput))?
        .register_stage(GENERATE_DRAFT, Arc::new(GenerateDraft::new(deps.content)))?
        .register_stage(DEBATE_DRAFT, Arc::new(DebateDraft::new(deps.debate)))?
        .register_stage(HUMAN_APPROVAL, Arc::new(HumanApproval::new(deps.approval)))?
        .register_stage(SELF_CORRECTION, Arc::new(SelfCorrection))?
        .register_stage(FINALIZE, Arc::new(Finalize::new(deps.sink)))?;

    graph
        .set_entry(COLLECT_INPUT)?
        .add_edge(COLLECT_INPUT, GENERATE_DRAFT)?
        .add_edge(GENERATE_DRAFT, DEBATE_DRAFT)?
        .add_edge(DEBATE_DRAFT, HUMAN_APPROVAL)?
        .add_edge(HUMAN_APPROVAL, SELF_CORRECTION)?
        .add_conditional_edge(SELF_CORRECTION, route_after_audit)?
        .add_edge(FINALIZE, END)?;

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_after_audit() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        assert_eq!(route_after_audit(&state), FINALIZE);

        state.corrections.push("Content too short, regenerate.".into());
        assert_eq!(route_after_audit(&state), GENERATE_DRAFT);
    }

    #[test]
    fn test_approval_does_not_affect_routing() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        state.approved = false;
        assert_eq!(route_after_audit(&state), FINALIZE);

        state.approved = true;
        state.corrections.push("Missing hashtags, regenerate.".into());
        assert_eq!(route_after_audit(&state), GENERATE_DRAFT);
    }
}
