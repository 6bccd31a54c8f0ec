// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Critique net: the validation retry loop with adversarial critique in place
//! of the plain commit.
//!
//! Out of `verified` a proposal is either critiqued (trigger guard) or skips
//! critique (its negation). Skipped proposals commit directly unless their
//! confidence is under the floor, in which case they go to a human. Critiqued
//! proposals are routed by survival score: accept with confidences scaled by
//! the score, escalate, or auto-reject.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AxiomConfig, NetKind, TriggerConfig};
use crate::critique::CritiqueResult;
use crate::engine::events::{EngineEventKind, EventData};
use crate::engine::{PetriEngine, PlaceConfig, TransitionConfig};
use crate::errors::{ActionError, NetConfigError};
use crate::guards::critique::{
    below_confidence_floor, critique_rejected, critique_trigger, reconsider, skip_critique, survived,
};
use crate::guards::decision::validation_passed;
use crate::nets::places::{COMMITTED, CRITIQUED, ESCALATED, PROPOSAL, REJECTED, VERIFIED};
use crate::nets::transitions::{ACCEPT_ADJUSTED, AUTO_REJECT, CRITIQUE, ESCALATE, SKIP_CRITIQUE};
use crate::nets::validation::register_retry_loop;
use crate::nets::{
    read_proposal, write_payload, WorkflowNet, PRIORITY_ACCEPT, PRIORITY_REJECT, PRIORITY_RETRY,
};
use crate::observability::messages::critique::{CritiqueCompleted, CritiqueScoreDiscarded};
use crate::observability::messages::StructuredLog;
use crate::token::{Token, TokenColor};
use crate::traits::action::single_input;
use crate::traits::{
    ActionOutput, Committer, CritiqueAgent, FireContext, Regenerator, TransitionAction, Validator,
};

pub fn critique_net(
    config: &AxiomConfig,
    validator: Arc<dyn Validator>,
    regenerator: Arc<dyn Regenerator>,
    committer: Arc<dyn Committer>,
    critic: Arc<dyn CritiqueAgent>,
) -> Result<WorkflowNet, NetConfigError> {
    let trigger = config.critique.trigger.clone();
    let routing = config.critique.routing.clone();

    let mut engine = PetriEngine::new(&config.engine);
    register_retry_loop(&mut engine, validator, regenerator)?;

    engine.add_place(PlaceConfig::new(CRITIQUED).accepting([TokenColor::Critiqued]))?;
    engine.add_place(PlaceConfig::new(COMMITTED).accepting([TokenColor::Committed]).sink())?;
    engine.add_place(PlaceConfig::new(ESCALATED).accepting([TokenColor::Escalated]).sink())?;

    engine.add_transition(
        TransitionConfig::new(CRITIQUE, Arc::new(CritiqueAction { critic }))
            .from_places(&[VERIFIED])
            .to_places(&[CRITIQUED])
            .guard(validation_passed().and(critique_trigger(trigger.clone()))),
    )?;
    engine.add_transition(
        TransitionConfig::new(
            SKIP_CRITIQUE,
            Arc::new(SkipCritiqueAction {
                committer: committer.clone(),
                trigger: trigger.clone(),
            }),
        )
        .from_places(&[VERIFIED])
        .to_places(&[COMMITTED, ESCALATED])
        .guard(validation_passed().and(skip_critique(trigger))),
    )?;
    engine.add_transition(
        TransitionConfig::new(ACCEPT_ADJUSTED, Arc::new(AcceptAdjustedAction { committer }))
            .from_places(&[CRITIQUED])
            .to_places(&[COMMITTED])
            .guard(survived(routing.clone()))
            .priority(PRIORITY_ACCEPT),
    )?;
    engine.add_transition(
        TransitionConfig::new(ESCALATE, Arc::new(EscalateAction))
            .from_places(&[CRITIQUED])
            .to_places(&[ESCALATED])
            .guard(reconsider(routing.clone()))
            .priority(PRIORITY_RETRY),
    )?;
    engine.add_transition(
        TransitionConfig::new(AUTO_REJECT, Arc::new(AutoRejectAction))
            .from_places(&[CRITIQUED])
            .to_places(&[REJECTED])
            .guard(critique_rejected(routing))
            .priority(PRIORITY_REJECT),
    )?;

    Ok(WorkflowNet::new(
        NetKind::Critique,
        engine,
        PROPOSAL,
        TokenColor::Pending,
        vec![COMMITTED],
        config.retry.max_retries,
    ))
}

fn survival_of(token: &Token) -> f64 {
    token
        .metadata
        .critique
        .as_ref()
        .map_or(1.0, |c| c.survival_score)
}

fn critique_event(ctx: &FireContext, kind: EngineEventKind, token: &Token, detail: impl Into<String>) {
    ctx.events.emit(
        kind,
        EventData::Critique {
            token_id: token.id(),
            survival_score: token.metadata.critique.as_ref().map(|c| c.survival_score),
            detail: Some(detail.into()),
        },
    );
}

/// Runs the critique agent and caches its result on the token so the routing
/// guards can read it synchronously.
pub struct CritiqueAction {
    critic: Arc<dyn CritiqueAgent>,
}

#[async_trait]
impl TransitionAction for CritiqueAction {
    async fn execute(&self, inputs: Vec<Token>, ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        critique_event(ctx, EngineEventKind::CritiqueStarted, &token, "critique requested");

        let mut result = self.critic.critique(&token).await.map_err(ActionError::Critique)?;
        if !result.survival_score.is_finite() {
            CritiqueScoreDiscarded {
                token_id: token.id(),
                survival_score: result.survival_score,
            }
            .log();
            result = CritiqueResult::neutral();
        }
        result.survival_score = result.survival_score.clamp(0.0, 1.0);

        CritiqueCompleted {
            token_id: token.id(),
            survival_score: result.survival_score,
            counter_arguments: result.counter_arguments.len(),
        }
        .log();

        let reason = format!(
            "critique survival score {:.2} from {} counter-argument(s)",
            result.survival_score,
            result.counter_arguments.len()
        );
        token.metadata.critique = Some(result);
        token.color = TokenColor::Critiqued;
        critique_event(ctx, EngineEventKind::CritiqueCompleted, &token, reason.clone());
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Critiqued]
    }

    fn name(&self) -> &'static str {
        "critique"
    }
}

/// Commits a proposal the trigger passed over, or parks it for a human when
/// its confidence is below the floor.
pub struct SkipCritiqueAction {
    committer: Arc<dyn Committer>,
    trigger: TriggerConfig,
}

#[async_trait]
impl TransitionAction for SkipCritiqueAction {
    async fn execute(&self, inputs: Vec<Token>, ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let proposal = read_proposal(&token)?;

        let reason = if below_confidence_floor(&proposal, &self.trigger) {
            token.color = TokenColor::Escalated;
            format!(
                "max confidence below floor {:.2}; queued for human review",
                self.trigger.confidence_floor
            )
        } else {
            self.committer
                .commit(&proposal)
                .await
                .map_err(ActionError::Committer)?;
            token.color = TokenColor::Committed;
            "critique not triggered; committed to the graph".to_string()
        };

        critique_event(ctx, EngineEventKind::CritiqueSkipped, &token, reason.clone());
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Committed, TokenColor::Escalated]
    }

    fn name(&self) -> &'static str {
        "skip_critique"
    }
}

/// Scales every item's confidence by the survival score, then commits.
pub struct AcceptAdjustedAction {
    committer: Arc<dyn Committer>,
}

#[async_trait]
impl TransitionAction for AcceptAdjustedAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let score = survival_of(&token);
        let mut proposal = read_proposal(&token)?;
        proposal.scale_confidence(score);

        self.committer
            .commit(&proposal)
            .await
            .map_err(ActionError::Committer)?;
        write_payload(&mut token, &proposal, "graph proposal")?;
        token.color = TokenColor::Committed;

        let reason = format!("survived critique at {:.2}; confidences scaled and committed", score);
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Committed]
    }

    fn name(&self) -> &'static str {
        "accept_adjusted"
    }
}

pub struct EscalateAction;

#[async_trait]
impl TransitionAction for EscalateAction {
    async fn execute(&self, inputs: Vec<Token>, ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        token.color = TokenColor::Escalated;
        let reason = format!(
            "survival score {:.2} in the reconsider band; escalated to a human",
            survival_of(&token)
        );
        critique_event(ctx, EngineEventKind::CritiqueEscalated, &token, reason.clone());
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Escalated]
    }

    fn name(&self) -> &'static str {
        "escalate"
    }
}

pub struct AutoRejectAction;

#[async_trait]
impl TransitionAction for AutoRejectAction {
    async fn execute(&self, inputs: Vec<Token>, ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        token.color = TokenColor::Rejected;
        let reason = format!(
            "survival score {:.2} below rejection threshold",
            survival_of(&token)
        );
        critique_event(ctx, EngineEventKind::CritiqueRejected, &token, reason.clone());
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Rejected]
    }

    fn name(&self) -> &'static str {
        "auto_reject"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{EchoRegenerator, RecordingCommitter, ScriptedCritic, ScriptedValidator};
    use crate::engine::EventBus;
    use crate::token::GraphProposal;

    #[test]
    fn test_net_topology() {
        let net = critique_net(
            &AxiomConfig::default(),
            Arc::new(ScriptedValidator::always_valid()),
            Arc::new(EchoRegenerator::default()),
            Arc::new(RecordingCommitter::default()),
            Arc::new(ScriptedCritic::with_score(1.0)),
        )
        .unwrap();

        let engine = net.engine();
        assert!(engine.transition("accept").is_none());
        assert_eq!(engine.transitions().len(), 10);
        assert_eq!(engine.places().filter(|p| p.is_sink()).count(), 3);
        let skip = engine.transition(SKIP_CRITIQUE).unwrap();
        assert_eq!(skip.route(TokenColor::Committed), Some(COMMITTED));
        assert_eq!(skip.route(TokenColor::Escalated), Some(ESCALATED));
    }

    #[tokio::test]
    async fn test_critique_clamps_score_and_emits_events() {
        let events = EventBus::new(16);
        let mut sub = events.subscribe();
        let ctx = FireContext {
            transition_id: CRITIQUE.into(),
            step: 1,
            events,
        };
        let action = CritiqueAction {
            critic: Arc::new(ScriptedCritic::with_score(1.7)),
        };
        let token = Token::for_proposal(&GraphProposal::new("p").with_node("a", "A", 0.9)).unwrap();

        let out = action.execute(vec![token], &ctx).await.unwrap();
        assert_eq!(survival_of(&out.tokens[0]), 1.0);

        let kinds: Vec<_> = sub.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EngineEventKind::CritiqueStarted, EngineEventKind::CritiqueCompleted]
        );
    }

    #[tokio::test]
    async fn test_non_finite_score_is_replaced_by_neutral_result() {
        let ctx = FireContext {
            transition_id: CRITIQUE.into(),
            step: 1,
            events: EventBus::new(4),
        };
        let mut scripted = CritiqueResult::neutral();
        scripted.survival_score = f64::NAN;
        scripted.blind_spots = vec!["dosage".into()];
        let action = CritiqueAction {
            critic: Arc::new(ScriptedCritic::new(scripted)),
        };
        let token = Token::for_proposal(&GraphProposal::new("p").with_node("a", "A", 0.9)).unwrap();

        let out = action.execute(vec![token], &ctx).await.unwrap();
        let critique = out.tokens[0].metadata.critique.as_ref().unwrap();
        assert_eq!(critique, &CritiqueResult::neutral());
        assert_eq!(survival_of(&out.tokens[0]), 1.0);
    }
}
