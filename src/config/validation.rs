// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::AxiomConfig;
use crate::observability::messages::{config::ConfigValidationFailed, StructuredLog};

fn check_unit(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("{} must be within [0, 1], got {}", name, value));
    }
}

/// Checks value ranges across every section.
///
/// All problems are collected so a bad file can be fixed in one pass.
pub fn validate_config(config: &AxiomConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.engine.max_steps == 0 {
        errors.push("engine.max_steps must be greater than 0".to_string());
    }
    if config.engine.event_capacity == 0 {
        errors.push("engine.event_capacity must be greater than 0".to_string());
    }

    let trigger = &config.critique.trigger;
    check_unit(&mut errors, "critique.trigger.min_confidence", trigger.min_confidence);
    check_unit(&mut errors, "critique.trigger.confidence_floor", trigger.confidence_floor);
    check_unit(&mut errors, "critique.trigger.sample_rate", trigger.sample_rate);
    if trigger.confidence_floor > trigger.min_confidence {
        errors.push(format!(
            "critique.trigger.confidence_floor ({}) must not exceed min_confidence ({})",
            trigger.confidence_floor, trigger.min_confidence
        ));
    }

    let routing = &config.critique.routing;
    check_unit(&mut errors, "critique.routing.survival_threshold", routing.survival_threshold);
    check_unit(&mut errors, "critique.routing.rejection_threshold", routing.rejection_threshold);
    if routing.rejection_threshold > routing.survival_threshold {
        errors.push(format!(
            "critique.routing.rejection_threshold ({}) must not exceed survival_threshold ({})",
            routing.rejection_threshold, routing.survival_threshold
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        ConfigValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}
