// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Level 1 checks: shape of the payload.

use serde_json::json;

use crate::guards::Guard;
use crate::token::{FixType, GraphProposal, Severity, Violation};

/// Payload is an object with every listed field present and non-null.
pub fn required_fields(fields: &[&str]) -> Guard {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Guard::on_first(format!("required_fields[{}]", fields.join(",")), move |token| {
        token.payload.as_object().map_or(false, |obj| {
            fields.iter().all(|f| obj.get(f).map_or(false, |v| !v.is_null()))
        })
    })
}

pub fn proposal_well_formed() -> Guard {
    Guard::on_proposal("proposal_well_formed", |p| schema_violations(p).is_empty())
}

/// Schema rule violations in a proposal, in document order.
pub fn schema_violations(proposal: &GraphProposal) -> Vec<Violation> {
    let mut violations = Vec::new();

    if proposal.id.trim().is_empty() {
        violations.push(
            Violation::new("required_field", Severity::Error, "proposal id is empty")
                .with_subject("id")
                .with_fix_type(FixType::AddField),
        );
    }

    for node in &proposal.nodes {
        if node.label.trim().is_empty() {
            violations.push(
                Violation::new("empty_label", Severity::Error, format!("node '{}' has an empty label", node.id))
                    .with_subject(node.id.clone())
                    .with_fix_type(FixType::UpdateValue),
            );
        }
        if !(0.0..=1.0).contains(&node.confidence) {
            violations.push(confidence_violation(&node.id, node.confidence));
        }
    }

    for edge in &proposal.edges {
        if edge.label.trim().is_empty() {
            violations.push(
                Violation::new("empty_label", Severity::Error, format!("edge '{}' has an empty label", edge.id))
                    .with_subject(edge.id.clone())
                    .with_fix_type(FixType::UpdateValue),
            );
        }
        if !(0.0..=1.0).contains(&edge.confidence) {
            violations.push(confidence_violation(&edge.id, edge.confidence));
        }
    }

    violations
}

fn confidence_violation(subject: &str, confidence: f64) -> Violation {
    Violation::new(
        "confidence_range",
        Severity::Error,
        format!("'{}' has confidence {} outside [0, 1]", subject, confidence),
    )
    .with_subject(subject)
    .with_actual(json!(confidence))
    .with_fix_type(FixType::UpdateValue)
}
