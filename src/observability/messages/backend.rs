// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the bundled local collaborators.
//!
//! This module contains message types for logging events related to:
//! * Structural validation runs
//! * Feedback-driven regeneration
//! * Heuristic critique
//! * Commits to the log-backed graph

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A local collaborator started work on a proposal.
///
/// # Log Level
/// `debug!` - Per-call detail
///
/// # Example
/// ```
/// use axiom::observability::messages::backend::BackendCallStarted;
///
/// let msg = BackendCallStarted {
///     backend: "structural_validator",
///     proposal_id: "req-1",
///     structure_size: 12,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct BackendCallStarted<'a> {
    pub backend: &'a str,
    pub proposal_id: &'a str,
    pub structure_size: usize,
}

impl Display for BackendCallStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Backend '{}' started on proposal '{}' ({} items)",
            self.backend, self.proposal_id, self.structure_size
        )
    }
}

impl StructuredLog for BackendCallStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            backend = self.backend,
            proposal_id = self.proposal_id,
            structure_size = self.structure_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "backend_call",
            span_name = name,
            backend = self.backend,
            proposal_id = self.proposal_id,
        )
    }
}

/// Structural validation finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProposalValidated<'a> {
    pub proposal_id: &'a str,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub duration: Duration,
}

impl Display for ProposalValidated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Proposal '{}' validated: valid={}, errors={}, warnings={}, duration={:?}",
            self.proposal_id, self.valid, self.errors, self.warnings, self.duration
        )
    }
}

impl StructuredLog for ProposalValidated<'_> {
    fn log(&self) {
        tracing::info!(
            proposal_id = self.proposal_id,
            valid = self.valid,
            errors = self.errors,
            warnings = self.warnings,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "proposal_validated",
            span_name = name,
            proposal_id = self.proposal_id,
            valid = self.valid,
        )
    }
}

/// A proposal was rewritten from correction feedback.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProposalRegenerated<'a> {
    pub proposal_id: &'a str,
    pub feedback_items: usize,
    pub removed_items: usize,
}

impl Display for ProposalRegenerated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Proposal '{}' regenerated from {} feedback item(s), {} item(s) removed",
            self.proposal_id, self.feedback_items, self.removed_items
        )
    }
}

impl StructuredLog for ProposalRegenerated<'_> {
    fn log(&self) {
        tracing::info!(
            proposal_id = self.proposal_id,
            feedback_items = self.feedback_items,
            removed_items = self.removed_items,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("proposal_regenerated", span_name = name, proposal_id = self.proposal_id)
    }
}

/// An accepted proposal was written out.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProposalCommitted<'a> {
    pub proposal_id: &'a str,
    pub nodes: usize,
    pub edges: usize,
}

impl Display for ProposalCommitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Committed proposal '{}': {} node(s), {} edge(s)",
            self.proposal_id, self.nodes, self.edges
        )
    }
}

impl StructuredLog for ProposalCommitted<'_> {
    fn log(&self) {
        tracing::info!(
            proposal_id = self.proposal_id,
            nodes = self.nodes,
            edges = self.edges,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("proposal_committed", span_name = name, proposal_id = self.proposal_id)
    }
}
