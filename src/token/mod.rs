// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Token model: colors, the audit envelope and the payload shapes the
//! bundled nets carry.

mod color;
mod council;
mod envelope;
mod proposal;
mod validation;

pub use color::TokenColor;
pub use council::{CouncilSession, MemberResponse, PeerReview};
pub use envelope::{Token, TokenMetadata, TransitionRecord};
pub use proposal::{GraphProposal, ProposedEdge, ProposedNode};
pub use validation::{FixType, Severity, ValidationResult, Violation};
