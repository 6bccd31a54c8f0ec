// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{MAJOR_WEIGHT, MINOR_WEIGHT, MODERATE_WEIGHT};
use crate::critique::{ArgumentSeverity, CounterArgument};

impl ArgumentSeverity {
    pub fn weight(&self) -> f64 {
        match self {
            ArgumentSeverity::Major => MAJOR_WEIGHT,
            ArgumentSeverity::Moderate => MODERATE_WEIGHT,
            ArgumentSeverity::Minor => MINOR_WEIGHT,
        }
    }
}

/// Severity-weighted average of per-argument scores.
///
/// Each argument's score says how well the proposal holds up against it
/// (1.0 = unharmed). No arguments means nothing landed, so the score is 1.0.
/// Item scores are clamped before weighting and non-finite scores are
/// skipped, so the result is always in [0, 1].
pub fn survival_score(arguments: &[CounterArgument]) -> f64 {
    let (weighted, total_weight) = arguments
        .iter()
        .filter(|arg| arg.score.is_finite())
        .fold((0.0, 0.0), |(sum, weights), arg| {
            let w = arg.severity.weight();
            (sum + w * arg.score.clamp(0.0, 1.0), weights + w)
        });

    if total_weight == 0.0 {
        return 1.0;
    }
    (weighted / total_weight).clamp(0.0, 1.0)
}
