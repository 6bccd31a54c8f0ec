// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Adversarial critique results and the survival score.

mod parse;
mod survival;

use serde::{Deserialize, Serialize};

use crate::config::consts::{DEFAULT_REJECTION_THRESHOLD, DEFAULT_SURVIVAL_THRESHOLD};

pub use parse::parse_critique_response;
pub use survival::survival_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentSeverity {
    Major,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterArgument {
    /// Node or edge id the argument attacks
    pub target: String,
    pub argument: String,
    pub severity: ArgumentSeverity,
    /// How well the target withstands this argument, 0-1
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    Reconsider,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub survival_score: f64,
    pub counter_arguments: Vec<CounterArgument>,
    pub blind_spots: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendation: Recommendation,
}

impl CritiqueResult {
    /// Result for a critique that found nothing to object to.
    pub fn neutral() -> Self {
        Self::from_arguments(Vec::new(), Vec::new(), Vec::new())
    }

    /// Builds a result whose score and recommendation follow from the arguments.
    pub fn from_arguments(
        counter_arguments: Vec<CounterArgument>,
        blind_spots: Vec<String>,
        risk_factors: Vec<String>,
    ) -> Self {
        let score = survival_score(&counter_arguments);
        let recommendation = if score >= DEFAULT_SURVIVAL_THRESHOLD {
            Recommendation::Accept
        } else if score >= DEFAULT_REJECTION_THRESHOLD {
            Recommendation::Reconsider
        } else {
            Recommendation::Reject
        };

        Self {
            survival_score: score,
            counter_arguments,
            blind_spots,
            risk_factors,
            recommendation,
        }
    }
}
