// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine lifecycle and run-loop events.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Step ceiling exhaustion
//! * Pause, resume, stop and reset requests

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Run loop started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use axiom::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     place_count: 7,
///     transition_count: 6,
///     max_steps: 100,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub place_count: usize,
    pub transition_count: usize,
    pub max_steps: u64,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run: {} places, {} transitions, max_steps={}",
            self.place_count, self.transition_count, self.max_steps
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            place_count = self.place_count,
            transition_count = self.transition_count,
            max_steps = self.max_steps,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            place_count = self.place_count,
            transition_count = self.transition_count,
            max_steps = self.max_steps,
        )
    }
}

/// Run loop returned.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub steps: u64,
    pub halt_reason: &'a str,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run halted ({}) after {} steps in {:?}",
            self.halt_reason, self.steps, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            steps = self.steps,
            halt_reason = self.halt_reason,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            steps = self.steps,
            halt_reason = self.halt_reason,
            duration = ?self.duration,
        )
    }
}

/// Run loop aborted by a failing step.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunFailed<'a> {
    pub steps: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run failed after {} steps: {}", self.steps, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(steps = self.steps, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("run_failed", span_name = name, steps = self.steps, error = %self.error)
    }
}

/// Step ceiling reached with transitions still enabled.
///
/// # Log Level
/// `warn!` - The run is inconclusive, not failed
pub struct StepLimitReached {
    pub max_steps: u64,
}

impl Display for StepLimitReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Step ceiling of {} reached; halting run", self.max_steps)
    }
}

impl StructuredLog for StepLimitReached {
    fn log(&self) {
        tracing::warn!(max_steps = self.max_steps, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("step_limit_reached", span_name = name, max_steps = self.max_steps)
    }
}

/// Pause, resume, stop or reset was applied to the engine.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineStateChanged<'a> {
    pub action: &'a str,
    pub step: u64,
}

impl Display for EngineStateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine {} at step {}", self.action, self.step)
    }
}

impl StructuredLog for EngineStateChanged<'_> {
    fn log(&self) {
        tracing::info!(action = self.action, step = self.step, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_state", span_name = name, action = self.action, step = self.step)
    }
}
