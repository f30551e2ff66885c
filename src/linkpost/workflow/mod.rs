// SPDX-License-Identifier: MIT

//! Post workflow - a state graph with a bounded self-correction loop

pub mod approval;
pub mod debate;
pub mod engine;
pub mod pipeline;
pub mod sink;
pub mod stages;
mod state;

pub use engine::{RetryPolicy, Stage, StateGraph, END};
pub use pipeline::{build_post_workflow, PostWorkflowDeps};
pub use state::{PostDraft, WorkflowState};
