// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReview {
    pub reviewer: String,
    pub target: String,
    pub critique: String,
    /// Reviewer's 0-1 rating of the target response
    pub score: f64,
}

/// Payload carried through the council pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilSession {
    pub prompt: String,
    #[serde(default)]
    pub responses: Vec<MemberResponse>,
    #[serde(default)]
    pub reviews: Vec<PeerReview>,
    #[serde(default)]
    pub synthesis: Option<String>,
    /// Set by the synthesize stage when the synthesis has real content
    #[serde(default)]
    pub has_content: bool,
}

impl CouncilSession {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            responses: Vec::new(),
            reviews: Vec::new(),
            synthesis: None,
            has_content: false,
        }
    }

    pub fn from_token(token: &Token) -> Result<Self, serde_json::Error> {
        Self::deserialize(&token.payload)
    }
}
