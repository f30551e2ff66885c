// SPDX-License-Identifier: MIT

//! State graph executor
//!
//! A workflow is a table of named stages, one outgoing edge per stage and a
//! designated entry. Edges are either fixed or computed from the state after
//! the stage runs. Execution walks the table until it reaches [END].

use crate::adk::error::{StageError, WorkflowError};
use crate::linkpost::workflow::state::WorkflowState;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Terminal marker; not a stage
pub const END: &str = "__end__";

/// One step of a workflow
#[async_trait]
pub trait Stage: Send + Sync {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError>;
}

/// Adapter that turns a synchronous closure into a [Stage]
pub struct FnStage<F>(pub F);

#[async_trait]
impl<F> Stage for FnStage<F>
where
    F: Fn(&mut WorkflowState) -> Result<(), StageError> + Send + Sync,
{
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        (self.0)(state)
    }
}

type Decision = Box<dyn Fn(&WorkflowState) -> String + Send + Sync>;

enum Edge {
    To(String),
    Conditional(Decision),
}

/// Step budget of a run with no retries
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Extra steps granted for every allowed retry
pub const STEPS_PER_RETRY: usize = 10;

/// Bounds that guarantee a run terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// How many times a conditional edge may route back to a stage that already ran
    pub max_retries: u32,
    /// Safety limit on stage executions per run
    pub max_steps: usize,
}

impl RetryPolicy {
    /// Retry bound with a step limit large enough that the retry bound is hit first
    pub fn with_retries(max_retries: u32) -> Self {
        let per_retry = STEPS_PER_RETRY.saturating_mul(max_retries as usize);
        Self {
            max_retries,
            max_steps: DEFAULT_MAX_STEPS.saturating_add(per_retry),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_retries(3)
    }
}

pub struct StateGraph {
    stages: HashMap<String, Arc<dyn Stage>>,
    edges: HashMap<String, Edge>,
    entry: Option<String>,
    policy: RetryPolicy,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            stages: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn register_stage(
        &mut self,
        name: impl Into<String>,
        stage: Arc<dyn Stage>,
    ) -> Result<&mut Self, WorkflowError> {
        let name = name.into();
        if name == END || self.stages.contains_key(&name) {
            return Err(WorkflowError::DuplicateStage(name));
        }
        self.stages.insert(name, stage);
        Ok(self)
    }

    /// Register a synchronous closure as a stage
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Self, WorkflowError>
    where
        F: Fn(&mut WorkflowState) -> Result<(), StageError> + Send + Sync + 'static,
    {
        self.register_stage(name, Arc::new(FnStage(f)))
    }

    pub fn set_entry(&mut self, name: impl Into<String>) -> Result<&mut Self, WorkflowError> {
        let name = name.into();
        self.ensure_registered(&name)?;
        self.entry = Some(name);
        Ok(self)
    }

    /// Fixed transition; `to` may be [END]
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<&mut Self, WorkflowError> {
        let (from, to) = (from.into(), to.into());
        self.ensure_registered(&from)?;
        if to != END {
            self.ensure_registered(&to)?;
        }
        self.insert_edge(from, Edge::To(to))
    }

    /// Transition chosen by `decision` from the state left behind by `from`
    pub fn add_conditional_edge<F, S>(
        &mut self,
        from: impl Into<String>,
        decision: F,
    ) -> Result<&mut Self, WorkflowError>
    where
        F: Fn(&WorkflowState) -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        let from = from.into();
        self.ensure_registered(&from)?;
        let decide: Decision = Box::new(move |s: &WorkflowState| -> String { decision(s).into() });
        self.insert_edge(from, Edge::Conditional(decide))
    }

    fn ensure_registered(&self, name: &str) -> Result<(), WorkflowError> {
        if self.stages.contains_key(name) {
            Ok(())
        } else {
            Err(WorkflowError::UnknownStage(name.to_string()))
        }
    }

    fn insert_edge(&mut self, from: String, edge: Edge) -> Result<&mut Self, WorkflowError> {
        if self.edges.contains_key(&from) {
            return Err(WorkflowError::DuplicateEdge(from));
        }
        self.edges.insert(from, edge);
        Ok(self)
    }

    /// Execute from the entry stage until [END].
    ///
    /// A failing stage does not stop the run: its error is appended to
    /// `state.corrections` and execution follows the stage's edge as usual.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        let run_id = Uuid::new_v4();
        let mut current = self.entry.clone().ok_or(WorkflowError::MissingEntry)?;
        let mut visited: HashSet<String> = HashSet::new();
        let mut retries = 0u32;
        let mut steps = 0usize;

        log::info!("[{}] Starting workflow for topic '{}'", run_id, state.brief.topic);

        while current != END {
            steps += 1;
            if steps > self.policy.max_steps {
                log::error!(
                    "[{}] Workflow exceeded max steps ({})",
                    run_id,
                    self.policy.max_steps
                );
                return Err(WorkflowError::StepLimitExceeded {
                    steps: self.policy.max_steps,
                    state: Box::new(state),
                });
            }

            let stage = self
                .stages
                .get(&current)
                .ok_or_else(|| WorkflowError::UnknownStage(current.clone()))?;

            log::info!("[{}] Step {}: executing stage {}", run_id, steps, current);
            if let Err(e) = stage.run(&mut state).await {
                log::error!("[{}] Stage {} failed: {}", run_id, current, e);
                state.corrections.push(format!("{} failed: {}", current, e));
            }
            visited.insert(current.clone());

            let next = match self.edges.get(&current) {
                None => return Err(WorkflowError::MissingEdge(current)),
                Some(Edge::To(next)) => next.clone(),
                Some(Edge::Conditional(decide)) => {
                    let next = decide(&state);
                    if next != END {
                        self.ensure_registered(&next)?;
                    }
                    if visited.contains(&next) {
                        if retries >= self.policy.max_retries {
                            log::error!(
                                "[{}] Giving up after {} retries; corrections: {:?}",
                                run_id,
                                retries,
                                state.corrections
                            );
                            return Err(WorkflowError::RetryLimitExceeded {
                                retries,
                                state: Box::new(state),
                            });
                        }
                        retries += 1;
                        log::warn!(
                            "[{}] Routing back {} -> {} (retry {}/{})",
                            run_id,
                            current,
                            next,
                            retries,
                            self.policy.max_retries
                        );
                    }
                    next
                }
            };

            current = next;
        }

        log::info!("[{}] Workflow completed after {} steps", run_id, steps);
        Ok(state)
    }
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}
