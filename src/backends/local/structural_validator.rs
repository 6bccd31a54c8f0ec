// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::Utc;
use std::time::Instant;

use crate::guards::constraint::constraint_violations;
use crate::guards::schema::schema_violations;
use crate::observability::messages::backend::{BackendCallStarted, ProposalValidated};
use crate::observability::messages::StructuredLog;
use crate::token::{GraphProposal, ValidationResult};
use crate::traits::Validator;

/// Validator built from the schema and constraint rules of the guard library.
///
/// Semantic checks are not performed, so level 3 always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

#[async_trait]
impl Validator for StructuralValidator {
    async fn validate(&self, proposal: &GraphProposal) -> anyhow::Result<ValidationResult> {
        let start_msg = BackendCallStarted {
            backend: "structural_validator",
            proposal_id: &proposal.id,
            structure_size: proposal.structure_size(),
        };
        let span = start_msg.span("validate");
        let _guard = span.enter();
        start_msg.log();

        let started_at = Utc::now();
        let timer = Instant::now();
        let mut violations = schema_violations(proposal);
        violations.extend(constraint_violations(proposal));
        let result = ValidationResult::from_violations(violations, started_at);

        ProposalValidated {
            proposal_id: &proposal.id,
            valid: result.valid,
            errors: result.error_count(),
            warnings: result.warnings().count(),
            duration: timer.elapsed(),
        }
        .log();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_proposal_passes() {
        let proposal = GraphProposal::new("p")
            .with_node("a", "Aspirin", 0.9)
            .with_node("b", "Headache", 0.8)
            .with_edge("e1", "a", "b", "treats", 0.85);
        let result = StructuralValidator.validate(&proposal).await.unwrap();
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn test_schema_and_constraint_levels_are_reported() {
        let proposal = GraphProposal::new("p")
            .with_node("a", "", 0.9)
            .with_edge("e1", "a", "a", "self", 0.5);
        let result = StructuralValidator.validate(&proposal).await.unwrap();

        assert!(!result.valid);
        assert!(!result.level1_passed);
        assert!(!result.level2_passed);
        assert!(result.level3_passed);
        let rules: Vec<_> = result.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(rules, vec!["empty_label", "no_self_loop"]);
    }
}
