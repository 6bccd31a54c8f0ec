// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Critique trigger and post-critique routing guards.

use crate::config::{RoutingConfig, TriggerConfig};
use crate::guards::Guard;
use crate::token::{CouncilSession, GraphProposal, Token};

/// Whether a proposal goes to adversarial critique.
///
/// A max confidence below the floor always means no critique, whatever else
/// holds; the skip path sends such proposals to human review. Otherwise any
/// of high confidence, large structure, sensitive category or a sample hit
/// selects it. The sample roll is fixed on the token when it is created.
pub fn should_critique(proposal: &GraphProposal, sample_roll: f64, cfg: &TriggerConfig) -> bool {
    let max_confidence = proposal.max_confidence().unwrap_or(0.0);
    if max_confidence < cfg.confidence_floor {
        return false;
    }

    let sensitive = proposal
        .category
        .as_deref()
        .map_or(false, |c| cfg.sensitive_categories.iter().any(|s| s.eq_ignore_ascii_case(c)));

    max_confidence >= cfg.min_confidence
        || proposal.structure_size() >= cfg.min_structure_size
        || sensitive
        || sample_roll < cfg.sample_rate
}

pub fn critique_trigger(cfg: TriggerConfig) -> Guard {
    Guard::on_first("critique_trigger", move |token| {
        GraphProposal::from_token(token)
            .map_or(false, |p| should_critique(&p, token.metadata.sample_roll, &cfg))
    })
}

/// Negation of the trigger, but still false for an unreadable payload.
pub fn skip_critique(cfg: TriggerConfig) -> Guard {
    Guard::on_first("skip_critique", move |token| {
        GraphProposal::from_token(token)
            .map_or(false, |p| !should_critique(&p, token.metadata.sample_roll, &cfg))
    })
}

/// Max confidence under the floor: no critique, straight to a human.
pub fn below_confidence_floor(proposal: &GraphProposal, cfg: &TriggerConfig) -> bool {
    proposal.max_confidence().unwrap_or(0.0) < cfg.confidence_floor
}

fn survival(token: &Token) -> Option<f64> {
    token.metadata.critique.as_ref().map(|c| c.survival_score)
}

pub fn has_critique() -> Guard {
    Guard::on_first("has_critique", |t| t.metadata.critique.is_some())
}

pub fn survived(routing: RoutingConfig) -> Guard {
    Guard::on_first("survived", move |t| {
        survival(t).map_or(false, |s| s >= routing.survival_threshold)
    })
}

pub fn reconsider(routing: RoutingConfig) -> Guard {
    Guard::on_first("reconsider", move |t| {
        survival(t).map_or(false, |s| {
            s >= routing.rejection_threshold && s < routing.survival_threshold
        })
    })
}

pub fn critique_rejected(routing: RoutingConfig) -> Guard {
    Guard::on_first("critique_rejected", move |t| {
        survival(t).map_or(false, |s| s < routing.rejection_threshold)
    })
}

/// Council output carries a non-empty synthesis.
pub fn has_synthesis_content() -> Guard {
    Guard::on_first("has_synthesis_content", |t| {
        CouncilSession::from_token(t).map_or(false, |s| s.has_content)
    })
}
