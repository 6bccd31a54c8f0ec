// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Workflow finished; `outcome` names how.
///
/// # Log Level
/// `info!` on success, `warn!` otherwise
pub struct WorkflowFinished<'a> {
    pub net: &'a str,
    pub correlation_id: &'a str,
    pub success: bool,
    pub outcome: &'a str,
    pub final_place: Option<&'a str>,
    pub total_steps: u64,
}

impl Display for WorkflowFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} workflow for '{}' finished {} in '{}' after {} steps",
            self.net,
            self.correlation_id,
            self.outcome,
            self.final_place.unwrap_or("<none>"),
            self.total_steps
        )
    }
}

impl StructuredLog for WorkflowFinished<'_> {
    fn log(&self) {
        if self.success {
            tracing::info!(
                net = self.net,
                correlation_id = self.correlation_id,
                outcome = self.outcome,
                final_place = self.final_place,
                total_steps = self.total_steps,
                "{}", self
            );
        } else {
            tracing::warn!(
                net = self.net,
                correlation_id = self.correlation_id,
                outcome = self.outcome,
                final_place = self.final_place,
                total_steps = self.total_steps,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow",
            span_name = name,
            net = self.net,
            correlation_id = self.correlation_id,
        )
    }
}

/// A request's token ended outside any sink and was withdrawn from the net.
///
/// # Log Level
/// `warn!` - Request needs attention
pub struct TokenParked<'a> {
    pub net: &'a str,
    pub correlation_id: &'a str,
    pub place: Option<&'a str>,
    pub outcome: &'a str,
}

impl Display for TokenParked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} workflow for '{}' ended {} in '{}'; token parked",
            self.net,
            self.correlation_id,
            self.outcome,
            self.place.unwrap_or("<none>")
        )
    }
}

impl StructuredLog for TokenParked<'_> {
    fn log(&self) {
        tracing::warn!(
            net = self.net,
            correlation_id = self.correlation_id,
            place = self.place,
            outcome = self.outcome,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "token_parked",
            span_name = name,
            net = self.net,
            correlation_id = self.correlation_id,
        )
    }
}
