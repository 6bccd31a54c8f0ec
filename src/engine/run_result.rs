// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::errors::ExecutionError;
use crate::feedback::CorrectionFeedback;
use crate::token::{Token, TransitionRecord};

/// Why `run()` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// No transition was enabled
    Quiescent,
    /// Step ceiling reached with work still enabled; inconclusive
    MaxSteps,
    /// Stopped through the control handle
    Stopped,
}

impl HaltReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            HaltReason::Quiescent => "quiescent",
            HaltReason::MaxSteps => "max_steps",
            HaltReason::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub steps: u64,
    pub halt_reason: HaltReason,
}

/// How a workflow ended, judged from where its token came to rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Resting in a success sink
    Succeeded,
    /// Resting in a sink that is not a success sink (rejected, escalated)
    Terminated,
    /// Quiescent with the token outside any sink
    Stalled { place: String },
    /// Step ceiling hit
    Inconclusive,
    Stopped,
    /// An action or routing error aborted the run
    Failed { error: String },
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Succeeded => "succeeded",
            RunOutcome::Terminated => "terminated",
            RunOutcome::Stalled { .. } => "stalled",
            RunOutcome::Inconclusive => "inconclusive",
            RunOutcome::Stopped => "stopped",
            RunOutcome::Failed { .. } => "failed",
        }
    }
}

/// Per-request result built from the token's final resting place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub success: bool,
    pub outcome: RunOutcome,
    pub final_place: Option<String>,
    pub total_steps: u64,
    pub total_retries: u32,
    pub feedback_history: Vec<CorrectionFeedback>,
    pub transition_history: Vec<TransitionRecord>,
}

impl RunResult {
    /// `run` is what the engine returned; `token` is the request's token as
    /// found afterwards; `in_sink` says whether its place is a sink.
    pub fn from_run(
        run: Result<&RunSummary, &ExecutionError>,
        token: Option<&Token>,
        in_sink: bool,
        success_sinks: &[&str],
    ) -> Self {
        let final_place = token.and_then(|t| t.metadata.current_place.clone());
        let at_success_sink = final_place
            .as_deref()
            .map_or(false, |p| success_sinks.contains(&p));

        let (outcome, total_steps) = match run {
            Err(e) => (RunOutcome::Failed { error: e.to_string() }, 0),
            Ok(summary) => {
                let outcome = if at_success_sink {
                    RunOutcome::Succeeded
                } else if in_sink {
                    RunOutcome::Terminated
                } else {
                    match summary.halt_reason {
                        HaltReason::MaxSteps => RunOutcome::Inconclusive,
                        HaltReason::Stopped => RunOutcome::Stopped,
                        HaltReason::Quiescent => RunOutcome::Stalled {
                            place: final_place.clone().unwrap_or_default(),
                        },
                    }
                };
                (outcome, summary.steps)
            }
        };

        Self {
            success: outcome == RunOutcome::Succeeded,
            outcome,
            final_place,
            total_steps,
            total_retries: token.map_or(0, |t| t.retry_count),
            feedback_history: token.map(|t| t.feedback_history().to_vec()).unwrap_or_default(),
            transition_history: token
                .map(|t| t.metadata.transition_history().to_vec())
                .unwrap_or_default(),
        }
    }

    pub fn with_steps(mut self, steps: u64) -> Self {
        self.total_steps = steps;
        self
    }
}
