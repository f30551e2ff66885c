// SPDX-License-Identifier: MIT

//! The six stages of the post workflow

use crate::adk::error::{StageError, ValidationError};
use crate::linkpost::content::{hooks::DEFAULT_HOOK_COUNT, ContentGenerator};
use crate::linkpost::workflow::approval::ApprovalGate;
use crate::linkpost::workflow::debate::{render_transcript, Debate};
use crate::linkpost::workflow::engine::Stage;
use crate::linkpost::workflow::sink::{output_key, OutputSink};
use crate::linkpost::workflow::state::{PostDraft, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

pub const MIN_WORD_COUNT: usize = 50;
pub const TOO_SHORT: &str = "Content too short, regenerate.";
pub const MISSING_HASHTAGS: &str = "Missing hashtags, regenerate.";

/// Audit findings for a draft; empty means publishable
pub fn audit_draft(draft: &PostDraft) -> Vec<String> {
    let mut findings = Vec::new();
    if draft.word_count() < MIN_WORD_COUNT {
        findings.push(TOO_SHORT.to_string());
    }
    if draft.hashtags.is_empty() {
        findings.push(MISSING_HASHTAGS.to_string());
    }
    findings
}

/// Trims the brief and fills blank parameters with defaults
pub struct CollectInput;

#[async_trait]
impl Stage for CollectInput {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        state.brief = state.brief.clone().normalized()?;
        Ok(())
    }
}

/// Body, hooks and hashtags requested together; any failure fails the stage
pub struct GenerateDraft {
    content: Arc<ContentGenerator>,
}

impl GenerateDraft {
    pub fn new(content: Arc<ContentGenerator>) -> Self {
        Self { content }
    }
}

#[async_trait]
impl Stage for GenerateDraft {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        let brief = &state.brief;
        if brief.topic.trim().is_empty() {
            return Err(ValidationError::MissingTopic.into());
        }
        let (content, hooks, hashtags) = futures::try_join!(
            self.content.try_post_body(brief),
            self.content.try_hooks(&brief.topic, DEFAULT_HOOK_COUNT),
            self.content.try_hashtags(&brief.topic),
        )?;

        let draft = PostDraft {
            topic: brief.topic.clone(),
            content,
            audience: brief.audience.clone(),
            tone: brief.tone.clone(),
            hooks,
            hashtags,
        };
        log::info!(
            "Draft generated: {} words, {} hooks, {} hashtags",
            draft.word_count(),
            draft.hooks.len(),
            draft.hashtags.len()
        );

        state.draft = Some(draft);
        state.corrections.clear();
        Ok(())
    }
}

/// Runs the critique dialogue. The outcome is logged only; the state is not touched.
pub struct DebateDraft {
    debate: Debate,
}

impl DebateDraft {
    pub fn new(debate: Debate) -> Self {
        Self { debate }
    }
}

#[async_trait]
impl Stage for DebateDraft {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        let opening = Debate::opening(state.draft.as_ref());
        match self.debate.run(&opening).await {
            Ok(turns) => {
                log::info!("Debate finished after {} turns", turns.len());
                log::debug!("Debate transcript:\n{}", render_transcript(&opening, &turns));
            }
            // advisory only, never sends the run back
            Err(e) => log::warn!("Debate failed: {}", e),
        }
        Ok(())
    }
}

pub struct HumanApproval {
    gate: Arc<dyn ApprovalGate>,
}

impl HumanApproval {
    pub fn new(gate: Arc<dyn ApprovalGate>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Stage for HumanApproval {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        let decision = self.gate.review(state).await;
        log::info!("Approval decision for '{}': {:?}", state.brief.topic, decision);
        state.approved = decision.is_approved();
        Ok(())
    }
}

/// Appends audit findings to the corrections
pub struct SelfCorrection;

#[async_trait]
impl Stage for SelfCorrection {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        if let Some(draft) = &state.draft {
            let findings = audit_draft(draft);
            state.corrections.extend(findings);
        }
        if state.needs_correction() {
            log::warn!("Corrections needed: {:?}", state.corrections);
        }
        Ok(())
    }
}

pub struct Finalize {
    sink: Arc<dyn OutputSink>,
}

impl Finalize {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Stage for Finalize {
    async fn run(&self, state: &mut WorkflowState) -> Result<(), StageError> {
        match &state.draft {
            Some(draft) => {
                self.sink
                    .write(&output_key(&state.brief.topic), &draft.content)
                    .await?
            }
            None => log::warn!("Nothing to save for '{}'", state.brief.topic),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::error::GenerationError;
    use crate::adk::generation::{GenerationRequest, GenerationService};
    use crate::linkpost::workflow::approval::ApprovalDecision;
    use std::sync::Mutex;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn draft(words_in_body: usize, hashtags: &[&str]) -> PostDraft {
        PostDraft {
            topic: "X".into(),
            content: words(words_in_body),
            audience: "professionals".into(),
            tone: "professional".into(),
            hooks: vec![],
            hashtags: hashtags.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_audit_short_draft() {
        assert_eq!(audit_draft(&draft(49, &["#A"])), vec![TOO_SHORT]);
    }

    #[test]
    fn test_audit_clean_draft() {
        assert!(audit_draft(&draft(200, &["#A", "#B"])).is_empty());
        assert!(audit_draft(&draft(50, &["#A"])).is_empty());
    }

    #[test]
    fn test_audit_short_without_hashtags() {
        assert_eq!(audit_draft(&draft(30, &[])), vec![TOO_SHORT, MISSING_HASHTAGS]);
    }

    #[tokio::test]
    async fn test_self_correction_without_draft_adds_nothing() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        SelfCorrection.run(&mut state).await.unwrap();
        assert!(state.corrections.is_empty());
    }

    #[tokio::test]
    async fn test_self_correction_appends() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        state.corrections.push("earlier".into());
        state.draft = Some(draft(10, &["#A"]));
        SelfCorrection.run(&mut state).await.unwrap();
        assert_eq!(state.corrections, vec!["earlier", TOO_SHORT]);
    }

    #[tokio::test]
    async fn test_collect_input_normalizes() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        state.brief.topic = "  Hiring  ".into();
        state.brief.tone = "   ".into();
        CollectInput.run(&mut state).await.unwrap();
        assert_eq!(state.brief.topic, "Hiring");
        assert_eq!(state.brief.tone, "professional");
    }

    /// Body/hooks/hashtags keyed off the user instruction
    struct DraftService {
        hashtags: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl GenerationService for DraftService {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            if self.fail {
                return Err(GenerationError::api("test", 500, "boom"));
            }
            let user = &request.user_instruction;
            Ok(if user.contains("hashtags") {
                self.hashtags.to_string()
            } else if user.contains("hooks") {
                "1. First hook\n2. Second hook".to_string()
            } else {
                format!("Post: {}", words(60))
            })
        }
    }

    fn generate_draft(hashtags: &'static str, fail: bool) -> GenerateDraft {
        GenerateDraft::new(Arc::new(ContentGenerator::new(Arc::new(DraftService {
            hashtags,
            fail,
        }))))
    }

    #[tokio::test]
    async fn test_generate_draft_replaces_draft_and_clears_corrections() {
        let mut state = WorkflowState::for_topic("Teams").unwrap();
        state.corrections.push(TOO_SHORT.into());

        generate_draft("#Teams #Work", false).run(&mut state).await.unwrap();

        let draft = state.draft.as_ref().unwrap();
        assert_eq!(draft.word_count(), 60);
        assert_eq!(draft.hooks, vec!["First hook", "Second hook"]);
        assert_eq!(draft.hashtags, vec!["#Teams", "#Work"]);
        assert!(state.corrections.is_empty());
    }

    #[tokio::test]
    async fn test_generate_draft_refuses_blank_topic() {
        let mut state = WorkflowState::for_topic("Teams").unwrap();
        state.brief.topic = "   ".into();
        state.corrections.push("collect_input failed: Topic is required".into());

        let err = generate_draft("#A", false).run(&mut state).await.unwrap_err();
        assert!(matches!(err, StageError::Validation(ValidationError::MissingTopic)));
        assert!(state.draft.is_none());
        assert_eq!(state.corrections.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_draft_keeps_empty_hashtags_visible() {
        let mut state = WorkflowState::for_topic("Teams").unwrap();
        generate_draft("none today", false).run(&mut state).await.unwrap();
        assert!(state.draft.unwrap().hashtags.is_empty());
    }

    #[tokio::test]
    async fn test_generate_draft_failure_keeps_previous_draft() {
        let mut state = WorkflowState::for_topic("Teams").unwrap();
        state.draft = Some(draft(10, &["#Old"]));
        state.corrections.push(TOO_SHORT.into());

        let err = generate_draft("#A", true).run(&mut state).await.unwrap_err();
        assert!(matches!(err, StageError::Generation(_)));
        assert_eq!(state.draft.unwrap().hashtags, vec!["#Old"]);
        assert_eq!(state.corrections, vec![TOO_SHORT]);
    }

    struct Reject;

    #[async_trait]
    impl ApprovalGate for Reject {
        async fn review(&self, _state: &WorkflowState) -> ApprovalDecision {
            ApprovalDecision::Rejected {
                reason: "no".into(),
            }
        }
    }

    #[tokio::test]
    async fn test_human_approval_sets_flag_only() {
        let mut state = WorkflowState::for_topic("X").unwrap();
        state.approved = true;
        HumanApproval::new(Arc::new(Reject)).run(&mut state).await.unwrap();
        assert!(!state.approved);
        assert!(state.corrections.is_empty());
    }

    #[derive(Default)]
    struct MemorySink {
        written: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl OutputSink for MemorySink {
        async fn write(&self, key: &str, content: &str) -> std::io::Result<()> {
            self.written
                .lock()
                .unwrap()
                .push((key.to_string(), content.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_finalize_writes_under_topic_key() {
        let sink = Arc::new(MemorySink::default());
        let stage = Finalize::new(sink.clone());

        let mut state = WorkflowState::for_topic("AI in Product Management").unwrap();
        stage.run(&mut state).await.unwrap();
        assert!(sink.written.lock().unwrap().is_empty());

        state.draft = Some(draft(3, &[]));
        stage.run(&mut state).await.unwrap();
        assert_eq!(
            *sink.written.lock().unwrap(),
            vec![("AI_in_Product_Management".to_string(), "word word word".to_string())]
        );
    }
}
