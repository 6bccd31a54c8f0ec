// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for adversarial critique.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;
use uuid::Uuid;

/// Critique agent returned a result.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CritiqueCompleted {
    pub token_id: Uuid,
    pub survival_score: f64,
    pub counter_arguments: usize,
}

impl Display for CritiqueCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Critique of token {} complete: survival={:.2}, {} counter-argument(s)",
            self.token_id, self.survival_score, self.counter_arguments
        )
    }
}

impl StructuredLog for CritiqueCompleted {
    fn log(&self) {
        tracing::info!(
            token_id = %self.token_id,
            survival_score = self.survival_score,
            counter_arguments = self.counter_arguments,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "critique_completed",
            span_name = name,
            token_id = %self.token_id,
            survival_score = self.survival_score,
        )
    }
}

/// Model output could not be read; the neutral result is used instead.
///
/// # Log Level
/// `warn!` - Degraded, not failed
pub struct CritiqueResponseMalformed<'a> {
    pub response_len: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for CritiqueResponseMalformed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Malformed critique response ({} bytes), using neutral result: {}",
            self.response_len, self.error
        )
    }
}

impl StructuredLog for CritiqueResponseMalformed<'_> {
    fn log(&self) {
        tracing::warn!(response_len = self.response_len, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "critique_response_malformed",
            span_name = name,
            response_len = self.response_len,
        )
    }
}

/// Critique agent returned a score that is not a number; the neutral result
/// is used instead.
///
/// # Log Level
/// `warn!` - Misbehaving collaborator
pub struct CritiqueScoreDiscarded {
    pub token_id: Uuid,
    pub survival_score: f64,
}

impl Display for CritiqueScoreDiscarded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarded non-finite survival score {} for token {}, using neutral result",
            self.survival_score, self.token_id
        )
    }
}

impl StructuredLog for CritiqueScoreDiscarded {
    fn log(&self) {
        tracing::warn!(
            token_id = %self.token_id,
            survival_score = self.survival_score,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("critique_score_discarded", span_name = name, token_id = %self.token_id)
    }
}
