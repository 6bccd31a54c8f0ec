// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Semantic tag carried by every token.
///
/// The color decides which places accept a token and, through each
/// transition's route table, which output place a fired token lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenColor {
    /// Fresh or regenerated proposal waiting for validation
    Pending,
    /// Validation ran; a result is attached but not yet judged
    Validated,
    /// Validation passed
    Valid,
    /// Validation failed
    Invalid,
    /// Correction feedback prepared, waiting for regeneration
    Feedback,
    Committed,
    Rejected,
    /// Adversarial critique attached, waiting for routing
    Critiqued,
    /// Parked for a human decision
    Escalated,
    /// Council pipeline stages
    Prompt,
    Generated,
    Reviewed,
    Synthesized,
    Emitted,
}

impl TokenColor {
    pub const ALL: [TokenColor; 14] = [
        TokenColor::Pending,
        TokenColor::Validated,
        TokenColor::Valid,
        TokenColor::Invalid,
        TokenColor::Feedback,
        TokenColor::Committed,
        TokenColor::Rejected,
        TokenColor::Critiqued,
        TokenColor::Escalated,
        TokenColor::Prompt,
        TokenColor::Generated,
        TokenColor::Reviewed,
        TokenColor::Synthesized,
        TokenColor::Emitted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenColor::Pending => "pending",
            TokenColor::Validated => "validated",
            TokenColor::Valid => "valid",
            TokenColor::Invalid => "invalid",
            TokenColor::Feedback => "feedback",
            TokenColor::Committed => "committed",
            TokenColor::Rejected => "rejected",
            TokenColor::Critiqued => "critiqued",
            TokenColor::Escalated => "escalated",
            TokenColor::Prompt => "prompt",
            TokenColor::Generated => "generated",
            TokenColor::Reviewed => "reviewed",
            TokenColor::Synthesized => "synthesized",
            TokenColor::Emitted => "emitted",
        }
    }
}

impl Display for TokenColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
