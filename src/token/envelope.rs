// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The token: an opaque payload wrapped in an append-only audit envelope.
//!
//! Histories on the envelope (transitions, feedback, validation trace) are only
//! reachable through append methods, so their lengths can never shrink for the
//! lifetime of a token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::consts::DEFAULT_MAX_RETRIES;
use crate::critique::CritiqueResult;
use crate::feedback::CorrectionFeedback;
use crate::token::{GraphProposal, TokenColor, ValidationResult};

/// Audit entry appended to every token a transition produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub transition_id: String,
    pub from_places: Vec<String>,
    pub to_places: Vec<String>,
    /// Never empty; the engine refuses to fire without one
    pub reason: String,
    pub guard_results: BTreeMap<String, bool>,
    pub step: u64,
    pub fired_at: DateTime<Utc>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub id: Uuid,
    /// Shared by every retry of one logical request
    pub correlation_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_place: Option<String>,
    pub previous_place: Option<String>,
    transition_history: Vec<TransitionRecord>,
    validation_trace: Vec<ValidationResult>,
    pub critique: Option<CritiqueResult>,
    /// Uniform draw in [0, 1) fixed at creation; the critique sampler reads it
    /// so the trigger guard stays pure.
    pub sample_roll: f64,
}

impl TokenMetadata {
    fn new(correlation_id: Option<String>) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Self {
            id,
            correlation_id: correlation_id.unwrap_or_else(|| id.to_string()),
            created_at: now,
            updated_at: now,
            current_place: None,
            previous_place: None,
            transition_history: Vec::new(),
            validation_trace: Vec::new(),
            critique: None,
            sample_roll: rand::random::<f64>(),
        }
    }

    pub fn transition_history(&self) -> &[TransitionRecord] {
        &self.transition_history
    }

    pub fn validation_trace(&self) -> &[ValidationResult] {
        &self.validation_trace
    }

    pub fn latest_validation(&self) -> Option<&ValidationResult> {
        self.validation_trace.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub payload: Value,
    pub color: TokenColor,
    pub retry_count: u32,
    pub max_retries: u32,
    feedback_history: Vec<CorrectionFeedback>,
    pub metadata: TokenMetadata,
}

impl Token {
    pub fn new(payload: Value, color: TokenColor) -> Self {
        Self {
            payload,
            color,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            feedback_history: Vec::new(),
            metadata: TokenMetadata::new(None),
        }
    }

    /// Pending token for a graph proposal, correlated by the proposal id.
    pub fn for_proposal(proposal: &GraphProposal) -> Result<Self, serde_json::Error> {
        Ok(Self::new(proposal.to_payload()?, TokenColor::Pending)
            .with_correlation_id(proposal.id.clone()))
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.metadata.correlation_id = correlation_id.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_sample_roll(mut self, roll: f64) -> Self {
        self.metadata.sample_roll = roll;
        self
    }

    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn correlation_id(&self) -> &str {
        &self.metadata.correlation_id
    }

    pub fn feedback_history(&self) -> &[CorrectionFeedback] {
        &self.feedback_history
    }

    /// Adds feedback after everything already recorded; earlier entries are kept.
    pub fn append_feedback<I>(&mut self, feedback: I)
    where
        I: IntoIterator<Item = CorrectionFeedback>,
    {
        self.feedback_history.extend(feedback);
        self.touch();
    }

    pub fn push_validation(&mut self, result: ValidationResult) {
        self.metadata.validation_trace.push(result);
        self.touch();
    }

    pub fn set_payload(&mut self, payload: Value) {
        self.payload = payload;
        self.touch();
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    pub(crate) fn record_transition(&mut self, record: TransitionRecord) {
        self.metadata.transition_history.push(record);
        self.touch();
    }

    pub(crate) fn move_to(&mut self, place_id: &str) {
        self.metadata.previous_place = self.metadata.current_place.take();
        self.metadata.current_place = Some(place_id.to_string());
        self.touch();
    }

    fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{CorrectionAction, CorrectionFeedback, ValidationLevel};
    use serde_json::json;

    #[test]
    fn test_new_token_defaults() {
        let token = Token::new(json!({"k": 1}), TokenColor::Pending);
        assert_eq!(token.retry_count, 0);
        assert_eq!(token.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(token.correlation_id(), token.id().to_string());
        assert!(token.metadata.transition_history().is_empty());
        assert!((0.0..1.0).contains(&token.metadata.sample_roll));
    }

    #[test]
    fn test_for_proposal_correlates_by_proposal_id() {
        let proposal = GraphProposal::new("req-42").with_node("n1", "A", 0.5);
        let token = Token::for_proposal(&proposal).unwrap();
        assert_eq!(token.correlation_id(), "req-42");
        assert_eq!(token.color, TokenColor::Pending);
        assert_eq!(GraphProposal::from_token(&token).unwrap(), proposal);
    }

    #[test]
    fn test_feedback_accumulates() {
        let mut token = Token::new(json!({}), TokenColor::Invalid);
        let first = CorrectionFeedback::manual(ValidationLevel::Schema, "r1", "first", CorrectionAction::Modify);
        let second = CorrectionFeedback::manual(ValidationLevel::Constraint, "r2", "second", CorrectionAction::Remove);

        token.append_feedback(vec![first.clone()]);
        token.append_feedback(vec![second.clone()]);

        assert_eq!(token.feedback_history(), &[first, second]);
    }

    #[test]
    fn test_move_to_tracks_previous_place() {
        let mut token = Token::new(json!({}), TokenColor::Pending);
        token.move_to("a");
        token.move_to("b");
        assert_eq!(token.metadata.current_place.as_deref(), Some("b"));
        assert_eq!(token.metadata.previous_place.as_deref(), Some("a"));
    }
}
