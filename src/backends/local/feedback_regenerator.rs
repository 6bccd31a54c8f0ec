// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashSet;

use crate::feedback::{CorrectionAction, CorrectionFeedback};
use crate::observability::messages::backend::{BackendCallStarted, ProposalRegenerated};
use crate::observability::messages::StructuredLog;
use crate::token::GraphProposal;
use crate::traits::Regenerator;

/// Deterministic regenerator that applies the structural corrections it can.
///
/// Only the latest round of feedback is applied. `Remove` drops the edge
/// named by the subject, `Merge` collapses repeated node ids into the first
/// occurrence. Everything else is left for a real generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackRegenerator;

fn latest_round(feedback: &[CorrectionFeedback]) -> Vec<&CorrectionFeedback> {
    let latest = feedback.iter().map(|f| f.attempt).max().unwrap_or(0);
    feedback.iter().filter(|f| f.attempt == latest).collect()
}

fn remove_edges(proposal: &mut GraphProposal, ids: &HashSet<&str>) -> usize {
    let before = proposal.edges.len();
    proposal.edges.retain(|e| !ids.contains(e.id.as_str()));
    before - proposal.edges.len()
}

fn merge_nodes(proposal: &mut GraphProposal, ids: &HashSet<&str>) -> usize {
    let before = proposal.nodes.len();
    let mut kept = HashSet::new();
    proposal
        .nodes
        .retain(|n| !ids.contains(n.id.as_str()) || kept.insert(n.id.clone()));
    before - proposal.nodes.len()
}

#[async_trait]
impl Regenerator for FeedbackRegenerator {
    async fn regenerate(
        &self,
        proposal: &GraphProposal,
        feedback: &[CorrectionFeedback],
    ) -> anyhow::Result<GraphProposal> {
        BackendCallStarted {
            backend: "feedback_regenerator",
            proposal_id: &proposal.id,
            structure_size: proposal.structure_size(),
        }
        .log();

        let round = latest_round(feedback);
        let subjects_for = |action: CorrectionAction| {
            round
                .iter()
                .filter(|f| f.action == action)
                .filter_map(|f| f.subject.as_deref())
                .collect::<HashSet<&str>>()
        };

        let mut revised = proposal.clone();
        let removed = remove_edges(&mut revised, &subjects_for(CorrectionAction::Remove))
            + merge_nodes(&mut revised, &subjects_for(CorrectionAction::Merge));

        ProposalRegenerated {
            proposal_id: &revised.id,
            feedback_items: round.len(),
            removed_items: removed,
        }
        .log();
        Ok(revised)
    }
}
