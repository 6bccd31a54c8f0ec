// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Maps validator violations onto correction feedback.
//!
//! Everything here is a pure table lookup: rule ids pick the level, the
//! human-readable constraint and (for well-known invariants) the expected
//! value; the validator's fix type picks the correction action.

use serde_json::Value;

use crate::feedback::{CorrectionAction, CorrectionFeedback, ValidationLevel};
use crate::token::{FixType, Severity, ValidationResult, Violation};

struct RuleInfo {
    id: &'static str,
    level: ValidationLevel,
    description: &'static str,
    expected: Option<&'static str>,
}

const KNOWN_RULES: &[RuleInfo] = &[
    RuleInfo {
        id: "required_field",
        level: ValidationLevel::Schema,
        description: "Every required field must be present",
        expected: Some("present"),
    },
    RuleInfo {
        id: "invalid_type",
        level: ValidationLevel::Schema,
        description: "Field values must have the declared type",
        expected: None,
    },
    RuleInfo {
        id: "empty_label",
        level: ValidationLevel::Schema,
        description: "Node and edge labels must not be empty",
        expected: Some("non-empty label"),
    },
    RuleInfo {
        id: "confidence_range",
        level: ValidationLevel::Schema,
        description: "Confidence must lie between 0 and 1",
        expected: Some("0.0 <= confidence <= 1.0"),
    },
    RuleInfo {
        id: "no_self_loop",
        level: ValidationLevel::Constraint,
        description: "An edge must not connect a node to itself",
        expected: Some("source != target"),
    },
    RuleInfo {
        id: "duplicate_edge",
        level: ValidationLevel::Constraint,
        description: "Edges must be unique by source, target and label",
        expected: Some("unique (source, target, label)"),
    },
    RuleInfo {
        id: "duplicate_node",
        level: ValidationLevel::Constraint,
        description: "Node ids must be unique within a proposal",
        expected: Some("unique node id"),
    },
    RuleInfo {
        id: "dangling_reference",
        level: ValidationLevel::Constraint,
        description: "Edge endpoints must reference nodes in the proposal",
        expected: Some("endpoint declared in nodes"),
    },
];

fn lookup(rule_id: &str) -> Option<&'static RuleInfo> {
    KNOWN_RULES.iter().find(|r| r.id == rule_id)
}

impl ValidationLevel {
    /// Level for a rule id: known rules first, then the `schema.` /
    /// `constraint.` / `semantic.` prefixes; anything else is semantic.
    pub fn classify(rule_id: &str) -> ValidationLevel {
        if let Some(rule) = lookup(rule_id) {
            return rule.level;
        }
        if rule_id.starts_with("schema.") {
            ValidationLevel::Schema
        } else if rule_id.starts_with("constraint.") {
            ValidationLevel::Constraint
        } else {
            ValidationLevel::Semantic
        }
    }
}

/// Human-readable constraint for a rule id, falling back to the raw id.
pub fn describe_rule(rule_id: &str) -> String {
    lookup(rule_id)
        .map(|r| r.description.to_string())
        .unwrap_or_else(|| rule_id.to_string())
}

/// Fixed mapping from validator fix types to correction actions.
pub fn action_for_fix(fix_type: Option<FixType>) -> CorrectionAction {
    match fix_type {
        Some(FixType::UpdateValue) | Some(FixType::AddField) | Some(FixType::ChangeType) => {
            CorrectionAction::Modify
        }
        Some(FixType::RemoveElement) | Some(FixType::RemoveDuplicate) => CorrectionAction::Remove,
        Some(FixType::MergeNodes) => CorrectionAction::Merge,
        Some(FixType::RewordLabel) | Some(FixType::Clarify) => CorrectionAction::Rephrase,
        None => CorrectionAction::Modify,
    }
}

pub struct FeedbackBuilder;

impl FeedbackBuilder {
    pub fn from_violation(violation: &Violation, attempt: u32) -> CorrectionFeedback {
        let known = lookup(&violation.rule_id);
        let expected = known
            .and_then(|r| r.expected)
            .map(|e| Value::String(e.to_string()))
            .or_else(|| violation.suggestion.clone().map(Value::String));

        CorrectionFeedback {
            level: ValidationLevel::classify(&violation.rule_id),
            rule_id: violation.rule_id.clone(),
            constraint: describe_rule(&violation.rule_id),
            message: violation.message.clone(),
            severity: violation.severity,
            subject: violation.subject.clone(),
            actual: violation.actual.clone(),
            expected,
            action: action_for_fix(violation.fix_type),
            attempt,
        }
    }

    /// Feedback for every error and warning in a result, in reported order.
    /// Informational violations carry nothing to correct and are skipped.
    pub fn from_validation(result: &ValidationResult, attempt: u32) -> Vec<CorrectionFeedback> {
        result
            .violations
            .iter()
            .filter(|v| v.severity != Severity::Info)
            .map(|v| Self::from_violation(v, attempt))
            .collect()
    }
}
