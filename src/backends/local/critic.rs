// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use async_trait::async_trait;

use crate::critique::{ArgumentSeverity, CounterArgument, CritiqueResult};
use crate::observability::messages::backend::BackendCallStarted;
use crate::observability::messages::StructuredLog;
use crate::token::{GraphProposal, Token};
use crate::traits::CritiqueAgent;

/// Items under this confidence draw a counter-argument.
pub const WEAK_CONFIDENCE: f64 = 0.5;

/// Offline critic that argues against weakly supported items.
///
/// Each node or edge under [`WEAK_CONFIDENCE`] gets one moderate
/// counter-argument scored at the item's own confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCritic;

fn weak_item(target: &str, kind: &str, confidence: f64) -> Option<CounterArgument> {
    (confidence < WEAK_CONFIDENCE).then(|| CounterArgument {
        target: target.to_string(),
        argument: format!("{} '{}' rests on low confidence {:.2}", kind, target, confidence),
        severity: ArgumentSeverity::Moderate,
        score: confidence,
    })
}

#[async_trait]
impl CritiqueAgent for HeuristicCritic {
    async fn critique(&self, token: &Token) -> anyhow::Result<CritiqueResult> {
        let proposal = GraphProposal::from_token(token).context("critique needs a graph proposal payload")?;
        BackendCallStarted {
            backend: "heuristic_critic",
            proposal_id: &proposal.id,
            structure_size: proposal.structure_size(),
        }
        .log();

        let arguments = proposal
            .nodes
            .iter()
            .filter_map(|n| weak_item(&n.id, "node", n.confidence))
            .chain(
                proposal
                    .edges
                    .iter()
                    .filter_map(|e| weak_item(&e.id, "edge", e.confidence)),
            )
            .collect();

        let mut blind_spots = Vec::new();
        if proposal.source_text.is_none() {
            blind_spots.push("no source text to check the claims against".to_string());
        }
        let risk_factors = proposal
            .category
            .iter()
            .map(|c| format!("category '{}'", c))
            .collect();

        Ok(CritiqueResult::from_arguments(arguments, blind_spots, risk_factors))
    }
}
