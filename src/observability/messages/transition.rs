// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for transition firing and token placement.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;
use uuid::Uuid;

/// Transition fired and deposited its outputs.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TransitionFired<'a> {
    pub transition_id: &'a str,
    pub step: u64,
    pub reason: &'a str,
    pub output_places: &'a [String],
    pub duration: std::time::Duration,
}

impl Display for TransitionFired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Transition '{}' fired at step {} -> [{}] in {:?}: {}",
            self.transition_id,
            self.step,
            self.output_places.join(", "),
            self.duration,
            self.reason
        )
    }
}

impl StructuredLog for TransitionFired<'_> {
    fn log(&self) {
        tracing::info!(
            transition_id = self.transition_id,
            step = self.step,
            reason = self.reason,
            output_places = ?self.output_places,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "transition_fired",
            span_name = name,
            transition_id = self.transition_id,
            step = self.step,
        )
    }
}

/// Transition action failed; its input tokens were put back.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TransitionFailed<'a> {
    pub transition_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for TransitionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transition '{}' failed: {}", self.transition_id, self.error)
    }
}

impl StructuredLog for TransitionFailed<'_> {
    fn log(&self) {
        tracing::error!(transition_id = self.transition_id, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "transition_failed",
            span_name = name,
            transition_id = self.transition_id,
            error = %self.error,
        )
    }
}

/// Transition inputs are present but a guard said no.
///
/// # Log Level
/// `debug!` - Expected on most scans
pub struct TransitionBlocked<'a> {
    pub transition_id: &'a str,
    pub guard_id: &'a str,
}

impl Display for TransitionBlocked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transition '{}' blocked by guard '{}'", self.transition_id, self.guard_id)
    }
}

impl StructuredLog for TransitionBlocked<'_> {
    fn log(&self) {
        tracing::debug!(transition_id = self.transition_id, guard_id = self.guard_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "transition_blocked",
            span_name = name,
            transition_id = self.transition_id,
            guard_id = self.guard_id,
        )
    }
}

/// Token placed into a place.
///
/// # Log Level
/// `debug!` - Per-token detail
pub struct TokenPlaced<'a> {
    pub token_id: Uuid,
    pub place_id: &'a str,
    pub color: &'a str,
}

impl Display for TokenPlaced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Token {} ({}) placed in '{}'", self.token_id, self.color, self.place_id)
    }
}

impl StructuredLog for TokenPlaced<'_> {
    fn log(&self) {
        tracing::debug!(
            token_id = %self.token_id,
            place_id = self.place_id,
            color = self.color,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "token_placed",
            span_name = name,
            token_id = %self.token_id,
            place_id = self.place_id,
        )
    }
}
