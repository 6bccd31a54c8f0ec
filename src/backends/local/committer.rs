// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::observability::messages::backend::ProposalCommitted;
use crate::observability::messages::StructuredLog;
use crate::token::GraphProposal;
use crate::traits::Committer;

/// Committer that records accepted proposals in the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCommitter;

#[async_trait]
impl Committer for LogCommitter {
    async fn commit(&self, proposal: &GraphProposal) -> anyhow::Result<()> {
        ProposalCommitted {
            proposal_id: &proposal.id,
            nodes: proposal.nodes.len(),
            edges: proposal.edges.len(),
        }
        .log();
        Ok(())
    }
}
