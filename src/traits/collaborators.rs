// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! External collaborators the bundled nets call from their actions.
//!
//! Implementations live outside the engine (LLM backends, graph validators,
//! the knowledge graph itself). Any error returned here is fatal for the
//! workflow run that triggered it.

use async_trait::async_trait;

use crate::critique::CritiqueResult;
use crate::feedback::CorrectionFeedback;
use crate::token::{CouncilSession, GraphProposal, MemberResponse, PeerReview, Token, ValidationResult};

#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, proposal: &GraphProposal) -> anyhow::Result<ValidationResult>;
}

/// Produces a corrected proposal from the full feedback history.
///
/// The returned proposal must keep the original proposal id.
#[async_trait]
pub trait Regenerator: Send + Sync {
    async fn regenerate(
        &self,
        proposal: &GraphProposal,
        feedback: &[CorrectionFeedback],
    ) -> anyhow::Result<GraphProposal>;
}

/// Writes an accepted proposal to the knowledge graph. Idempotency is the
/// implementor's concern.
#[async_trait]
pub trait Committer: Send + Sync {
    async fn commit(&self, proposal: &GraphProposal) -> anyhow::Result<()>;
}

#[async_trait]
pub trait CritiqueAgent: Send + Sync {
    async fn critique(&self, token: &Token) -> anyhow::Result<CritiqueResult>;
}

/// A panel of models: answer independently, review each other, then merge.
#[async_trait]
pub trait CouncilAgent: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<MemberResponse>>;

    async fn critique(&self, responses: &[MemberResponse]) -> anyhow::Result<Vec<PeerReview>>;

    async fn synthesize(&self, session: &CouncilSession) -> anyhow::Result<String>;
}
