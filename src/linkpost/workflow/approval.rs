// SPDX-License-Identifier: MIT

//! Approval checkpoint
//!
//! The workflow suspends here until a reviewer answers or the wait times out.
//! [AutoApprove] answers immediately; [ChannelApprovalGate] hands the draft to
//! an external reviewer over a channel.

use crate::linkpost::workflow::state::{PostDraft, WorkflowState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

pub const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Rejected { reason: String },
    TimedOut,
}

impl ApprovalDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn review(&self, state: &WorkflowState) -> ApprovalDecision;
}

/// Approves every draft
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn review(&self, _state: &WorkflowState) -> ApprovalDecision {
        ApprovalDecision::Approved
    }
}

/// A draft waiting for a reviewer
#[derive(Debug)]
pub struct ApprovalRequest {
    pub id: String,
    pub topic: String,
    pub draft: Option<PostDraft>,
    pub created_at: DateTime<Utc>,
    responder: oneshot::Sender<ApprovalDecision>,
}

impl ApprovalRequest {
    /// Send the decision back to the waiting workflow.
    ///
    /// Returns false if the workflow stopped waiting.
    pub fn respond(self, decision: ApprovalDecision) -> bool {
        self.responder.send(decision).is_ok()
    }
}

/// Forwards each review to a channel and waits for the answer
pub struct ChannelApprovalGate {
    sender: mpsc::Sender<ApprovalRequest>,
    timeout: Duration,
}

impl ChannelApprovalGate {
    /// Create the gate and the receiving end for the reviewer
    pub fn channel(buffer: usize, timeout: Duration) -> (Self, mpsc::Receiver<ApprovalRequest>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender, timeout }, receiver)
    }
}

#[async_trait]
impl ApprovalGate for ChannelApprovalGate {
    async fn review(&self, state: &WorkflowState) -> ApprovalDecision {
        let (responder, reply) = oneshot::channel();
        let request = ApprovalRequest {
            id: Uuid::new_v4().to_string(),
            topic: state.brief.topic.clone(),
            draft: state.draft.clone(),
            created_at: Utc::now(),
            responder,
        };
        let id = request.id.clone();

        if self.sender.send(request).await.is_err() {
            log::warn!("Approval {} has no reviewer listening", id);
            return ApprovalDecision::Rejected {
                reason: "No reviewer available".to_string(),
            };
        }

        log::info!("Approval {} waiting up to {:?}", id, self.timeout);
        match tokio::time::timeout(self.timeout, reply).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(_)) => ApprovalDecision::Rejected {
                reason: "Reviewer dropped the request".to_string(),
            },
            Err(_) => {
                log::warn!("Approval {} timed out", id);
                ApprovalDecision::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WorkflowState {
        WorkflowState::for_topic("Remote work").unwrap()
    }

    #[tokio::test]
    async fn test_auto_approve() {
        assert!(AutoApprove.review(&state()).await.is_approved());
    }

    #[tokio::test]
    async fn test_reviewer_decision_is_returned() {
        let (gate, mut rx) = ChannelApprovalGate::channel(1, Duration::from_secs(5));
        tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            assert_eq!(request.topic, "Remote work");
            request.respond(ApprovalDecision::Rejected {
                reason: "off brand".into(),
            });
        });

        assert_eq!(
            gate.review(&state()).await,
            ApprovalDecision::Rejected {
                reason: "off brand".into()
            }
        );
    }

    #[tokio::test]
    async fn test_silent_reviewer_times_out() {
        let (gate, mut rx) = ChannelApprovalGate::channel(1, Duration::from_millis(20));
        let holder = tokio::spawn(async move {
            let request = rx.recv().await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(request);
        });

        assert_eq!(gate.review(&state()).await, ApprovalDecision::TimedOut);
        holder.abort();
    }

    #[tokio::test]
    async fn test_dropped_reviewer_is_rejection() {
        let (gate, rx) = ChannelApprovalGate::channel(1, Duration::from_secs(5));
        drop(rx);

        let decision = gate.review(&state()).await;
        assert!(matches!(decision, ApprovalDecision::Rejected { .. }));
        assert!(!decision.is_approved());
    }
}
