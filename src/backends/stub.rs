// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::critique::CritiqueResult;
use crate::errors::{ActionError, StoreError};
use crate::feedback::CorrectionFeedback;
use crate::token::{
    CouncilSession, GraphProposal, MemberResponse, PeerReview, Token, TokenColor, ValidationResult,
};
use crate::traits::action::single_input;
use crate::traits::{
    ActionOutput, Committer, CouncilAgent, CritiqueAgent, FireContext, Regenerator, TokenQuery,
    TokenStore, TransitionAction, Validator,
};

/// Recolors its single input token.
pub struct RecolorAction {
    declared: Vec<TokenColor>,
    produces: TokenColor,
}

impl RecolorAction {
    pub fn new(color: TokenColor) -> Self {
        Self {
            declared: vec![color],
            produces: color,
        }
    }

    /// Declares every color in `colors`, produces the first.
    pub fn emitting(colors: Vec<TokenColor>) -> Self {
        let produces = colors.first().copied().unwrap_or(TokenColor::Pending);
        Self {
            declared: colors,
            produces,
        }
    }

    /// Declares one color but produces another, like a defective action.
    pub fn lying(declared: TokenColor, produces: TokenColor) -> Self {
        Self {
            declared: vec![declared],
            produces,
        }
    }
}

#[async_trait]
impl TransitionAction for RecolorAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        token.color = self.produces;
        Ok(ActionOutput::single(token))
    }

    fn emits(&self) -> Vec<TokenColor> {
        self.declared.clone()
    }

    fn name(&self) -> &'static str {
        "recolor"
    }
}

/// An action that always fails
pub struct FailingAction {
    declared: TokenColor,
}

impl FailingAction {
    pub fn new(declared: TokenColor) -> Self {
        Self { declared }
    }
}

#[async_trait]
impl TransitionAction for FailingAction {
    async fn execute(&self, _inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        Err(ActionError::Validator(anyhow::anyhow!("simulated action failure")))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![self.declared]
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Returns queued results in order, then repeats the last one.
pub struct ScriptedValidator {
    script: Mutex<VecDeque<ValidationResult>>,
    last: Mutex<ValidationResult>,
    calls: AtomicUsize,
}

impl ScriptedValidator {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let last = results.last().cloned().unwrap_or_else(ValidationResult::passed);
        Self {
            script: Mutex::new(results.into()),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_valid() -> Self {
        Self::new(vec![ValidationResult::passed()])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Validator for ScriptedValidator {
    async fn validate(&self, _proposal: &GraphProposal) -> anyhow::Result<ValidationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => {
                *self.last.lock().unwrap() = result.clone();
                Ok(result)
            }
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

/// A validator whose backend is down
pub struct FailingValidator;

#[async_trait]
impl Validator for FailingValidator {
    async fn validate(&self, _proposal: &GraphProposal) -> anyhow::Result<ValidationResult> {
        anyhow::bail!("validator backend unavailable")
    }
}

/// Fails for one proposal id and passes everything else.
pub struct RefusingValidator {
    pub refused_id: String,
}

impl RefusingValidator {
    pub fn new(refused_id: &str) -> Self {
        Self {
            refused_id: refused_id.to_string(),
        }
    }
}

#[async_trait]
impl Validator for RefusingValidator {
    async fn validate(&self, proposal: &GraphProposal) -> anyhow::Result<ValidationResult> {
        if proposal.id == self.refused_id {
            anyhow::bail!("backend down for {}", proposal.id);
        }
        Ok(ValidationResult::passed())
    }
}

/// Returns the proposal unchanged and records the feedback it was given.
#[derive(Default)]
pub struct EchoRegenerator {
    pub seen_feedback: Mutex<Vec<Vec<CorrectionFeedback>>>,
}

#[async_trait]
impl Regenerator for EchoRegenerator {
    async fn regenerate(
        &self,
        proposal: &GraphProposal,
        feedback: &[CorrectionFeedback],
    ) -> anyhow::Result<GraphProposal> {
        self.seen_feedback.lock().unwrap().push(feedback.to_vec());
        Ok(proposal.clone())
    }
}

/// Breaks the correlation contract by renaming the proposal.
pub struct RenamingRegenerator;

#[async_trait]
impl Regenerator for RenamingRegenerator {
    async fn regenerate(
        &self,
        proposal: &GraphProposal,
        _feedback: &[CorrectionFeedback],
    ) -> anyhow::Result<GraphProposal> {
        let mut renamed = proposal.clone();
        renamed.id = format!("{}-v2", proposal.id);
        Ok(renamed)
    }
}

#[derive(Default)]
pub struct RecordingCommitter {
    pub committed: Mutex<Vec<GraphProposal>>,
}

impl RecordingCommitter {
    pub fn committed(&self) -> Vec<GraphProposal> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Committer for RecordingCommitter {
    async fn commit(&self, proposal: &GraphProposal) -> anyhow::Result<()> {
        self.committed.lock().unwrap().push(proposal.clone());
        Ok(())
    }
}

/// Always answers with the same critique.
pub struct ScriptedCritic {
    result: CritiqueResult,
    calls: AtomicUsize,
}

impl ScriptedCritic {
    pub fn with_score(score: f64) -> Self {
        let mut result = CritiqueResult::neutral();
        result.survival_score = score;
        Self::new(result)
    }

    pub fn new(result: CritiqueResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CritiqueAgent for ScriptedCritic {
    async fn critique(&self, _token: &Token) -> anyhow::Result<CritiqueResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Each member echoes the prompt; synthesis is the joined answers, or blank
/// when `empty_synthesis` is set.
pub struct EchoCouncil {
    pub members: Vec<String>,
    pub empty_synthesis: bool,
}

impl EchoCouncil {
    pub fn new(members: &[&str]) -> Self {
        Self {
            members: members.iter().map(|m| m.to_string()).collect(),
            empty_synthesis: false,
        }
    }

    pub fn silent(mut self) -> Self {
        self.empty_synthesis = true;
        self
    }
}

#[async_trait]
impl CouncilAgent for EchoCouncil {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<MemberResponse>> {
        Ok(self
            .members
            .iter()
            .map(|m| MemberResponse {
                member: m.clone(),
                content: format!("{} says: {}", m, prompt),
            })
            .collect())
    }

    async fn critique(&self, responses: &[MemberResponse]) -> anyhow::Result<Vec<PeerReview>> {
        Ok(responses
            .iter()
            .flat_map(|target| {
                self.members
                    .iter()
                    .filter(move |r| **r != target.member)
                    .map(move |reviewer| PeerReview {
                        reviewer: reviewer.clone(),
                        target: target.member.clone(),
                        critique: "reasonable".into(),
                        score: 0.8,
                    })
            })
            .collect())
    }

    async fn synthesize(&self, session: &CouncilSession) -> anyhow::Result<String> {
        if self.empty_synthesis {
            return Ok("   ".into());
        }
        Ok(session
            .responses
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// A store that refuses every write.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl TokenStore for FailingStore {
    async fn save(&self, _token: &Token) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Token>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn get_by_correlation_id(&self, _correlation_id: &str) -> Result<Vec<Token>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn get_all(&self) -> Result<Vec<Token>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn cleanup(&self, _retention_days: u32) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn query(&self, _filter: &TokenQuery) -> Result<Vec<Token>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}
