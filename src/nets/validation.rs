// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation net: validate, decide, then accept, retry with feedback or reject.
//!
//! ```text
//! proposal ─validate─▶ validated ─decide─▶ verified ─accept(20)─▶ committed
//!    ▲                                └──▶ invalid ─prepare_retry(15)─▶ feedback
//!    │                                        └─reject(10)─▶ rejected
//!    └──────────────────regenerate────────────────────────────────┘
//! ```
//!
//! The loop is bounded by the token's `max_retries`; feedback accumulates
//! across every pass.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AxiomConfig, NetKind};
use crate::engine::{PetriEngine, PlaceConfig, TransitionConfig};
use crate::errors::{ActionError, NetConfigError};
use crate::feedback::FeedbackBuilder;
use crate::guards::decision::{
    escalate_eligible, has_validation_result, retry_eligible, validation_failed, validation_passed,
};
use crate::guards::semantic::semantically_coherent;
use crate::nets::places::{COMMITTED, FEEDBACK, INVALID, PROPOSAL, REJECTED, VALIDATED, VERIFIED};
use crate::nets::transitions::{ACCEPT, DECIDE, PREPARE_RETRY, REGENERATE, REJECT, VALIDATE};
use crate::nets::{
    read_proposal, write_payload, WorkflowNet, PRIORITY_ACCEPT, PRIORITY_REJECT, PRIORITY_RETRY,
};
use crate::token::{Token, TokenColor};
use crate::traits::action::single_input;
use crate::traits::{ActionOutput, Committer, FireContext, Regenerator, TransitionAction, Validator};

pub fn validation_net(
    config: &AxiomConfig,
    validator: Arc<dyn Validator>,
    regenerator: Arc<dyn Regenerator>,
    committer: Arc<dyn Committer>,
) -> Result<WorkflowNet, NetConfigError> {
    let mut engine = PetriEngine::new(&config.engine);
    register_retry_loop(&mut engine, validator, regenerator)?;

    engine.add_place(PlaceConfig::new(COMMITTED).accepting([TokenColor::Committed]).sink())?;
    engine.add_transition(
        TransitionConfig::new(ACCEPT, Arc::new(CommitAction { committer }))
            .from_places(&[VERIFIED])
            .to_places(&[COMMITTED])
            .guard(validation_passed())
            .priority(PRIORITY_ACCEPT),
    )?;

    Ok(WorkflowNet::new(
        NetKind::Validation,
        engine,
        PROPOSAL,
        TokenColor::Pending,
        vec![COMMITTED],
        config.retry.max_retries,
    ))
}

/// Registers everything both proposal nets share: the places up to
/// `verified` and the validate, decide, retry, reject and regenerate
/// transitions. What leaves `verified` is up to the caller.
pub(crate) fn register_retry_loop(
    engine: &mut PetriEngine,
    validator: Arc<dyn Validator>,
    regenerator: Arc<dyn Regenerator>,
) -> Result<(), NetConfigError> {
    engine.add_place(PlaceConfig::new(PROPOSAL).accepting([TokenColor::Pending]).source())?;
    engine.add_place(PlaceConfig::new(VALIDATED).accepting([TokenColor::Validated]))?;
    engine.add_place(PlaceConfig::new(VERIFIED).accepting([TokenColor::Valid]))?;
    engine.add_place(PlaceConfig::new(INVALID).accepting([TokenColor::Invalid]))?;
    engine.add_place(PlaceConfig::new(FEEDBACK).accepting([TokenColor::Feedback]))?;
    engine.add_place(PlaceConfig::new(REJECTED).accepting([TokenColor::Rejected]).sink())?;

    engine.add_transition(
        TransitionConfig::new(VALIDATE, Arc::new(ValidateAction { validator }))
            .from_places(&[PROPOSAL])
            .to_places(&[VALIDATED])
            .guard(semantically_coherent()),
    )?;
    engine.add_transition(
        TransitionConfig::new(DECIDE, Arc::new(DecideAction))
            .from_places(&[VALIDATED])
            .to_places(&[VERIFIED, INVALID])
            .guard(has_validation_result()),
    )?;
    engine.add_transition(
        TransitionConfig::new(PREPARE_RETRY, Arc::new(PrepareRetryAction))
            .from_places(&[INVALID])
            .to_places(&[FEEDBACK])
            .guard(validation_failed().and(retry_eligible()))
            .priority(PRIORITY_RETRY),
    )?;
    engine.add_transition(
        TransitionConfig::new(REJECT, Arc::new(RejectAction))
            .from_places(&[INVALID])
            .to_places(&[REJECTED])
            .guard(validation_failed().and(escalate_eligible()))
            .priority(PRIORITY_REJECT),
    )?;
    engine.add_transition(
        TransitionConfig::new(REGENERATE, Arc::new(RegenerateAction { regenerator }))
            .from_places(&[FEEDBACK])
            .to_places(&[PROPOSAL]),
    )?;
    Ok(())
}

/// Runs the validator and attaches its result to the token.
pub struct ValidateAction {
    validator: Arc<dyn Validator>,
}

#[async_trait]
impl TransitionAction for ValidateAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let proposal = read_proposal(&token)?;
        let result = self
            .validator
            .validate(&proposal)
            .await
            .map_err(ActionError::Validator)?;

        let reason = if result.valid {
            "validator reported no errors".to_string()
        } else {
            format!("validator reported {} error(s)", result.error_count())
        };
        token.push_validation(result);
        token.color = TokenColor::Validated;
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Validated]
    }

    fn name(&self) -> &'static str {
        "validate"
    }
}

/// Colors the token by its latest validation result.
pub struct DecideAction;

#[async_trait]
impl TransitionAction for DecideAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let valid = token.metadata.latest_validation().map_or(false, |v| v.valid);
        let reason = if valid {
            token.color = TokenColor::Valid;
            "latest validation passed"
        } else {
            token.color = TokenColor::Invalid;
            "latest validation failed"
        };
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Valid, TokenColor::Invalid]
    }

    fn name(&self) -> &'static str {
        "decide"
    }
}

/// Hands the proposal to the committer.
pub struct CommitAction {
    pub(crate) committer: Arc<dyn Committer>,
}

#[async_trait]
impl TransitionAction for CommitAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let proposal = read_proposal(&token)?;
        self.committer
            .commit(&proposal)
            .await
            .map_err(ActionError::Committer)?;
        token.color = TokenColor::Committed;
        Ok(ActionOutput::single(token).with_reason("validation passed; committed to the graph"))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Committed]
    }

    fn name(&self) -> &'static str {
        "commit"
    }
}

/// Turns the latest validation errors into correction feedback for the
/// next attempt.
pub struct PrepareRetryAction;

#[async_trait]
impl TransitionAction for PrepareRetryAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let attempt = token.retry_count + 1;
        let feedback = token
            .metadata
            .latest_validation()
            .map(|result| FeedbackBuilder::from_validation(result, attempt))
            .unwrap_or_default();

        let reason = format!(
            "prepared {} correction(s) for attempt {} of {}",
            feedback.len(),
            attempt,
            token.max_retries
        );
        token.append_feedback(feedback);
        token.color = TokenColor::Feedback;
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Feedback]
    }

    fn name(&self) -> &'static str {
        "prepare_retry"
    }
}

pub struct RejectAction;

#[async_trait]
impl TransitionAction for RejectAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let reason = format!(
            "still invalid after {} of {} retries",
            token.retry_count, token.max_retries
        );
        token.color = TokenColor::Rejected;
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Rejected]
    }

    fn name(&self) -> &'static str {
        "reject"
    }
}

/// Asks the regenerator for a corrected proposal and resubmits it.
///
/// The regenerator sees the whole feedback history, not only the latest
/// round. A proposal that comes back under a different id fails the run.
pub struct RegenerateAction {
    regenerator: Arc<dyn Regenerator>,
}

#[async_trait]
impl TransitionAction for RegenerateAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let proposal = read_proposal(&token)?;
        let revised = self
            .regenerator
            .regenerate(&proposal, token.feedback_history())
            .await
            .map_err(ActionError::Regenerator)?;

        if revised.id != proposal.id {
            return Err(ActionError::CorrelationMismatch {
                expected: proposal.id,
                actual: revised.id,
            });
        }

        write_payload(&mut token, &revised, "graph proposal")?;
        token.retry_count += 1;
        token.color = TokenColor::Pending;
        let reason = format!(
            "regenerated with {} correction(s); retry {} of {}",
            token.feedback_history().len(),
            token.retry_count,
            token.max_retries
        );
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Pending]
    }

    fn name(&self) -> &'static str {
        "regenerate"
    }
}
