// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guards reading the latest validation result and retry budget.

use crate::guards::Guard;

pub fn has_validation_result() -> Guard {
    Guard::on_first("has_validation_result", |t| t.metadata.latest_validation().is_some())
}

pub fn validation_passed() -> Guard {
    Guard::on_first("validation_passed", |t| {
        t.metadata.latest_validation().map_or(false, |v| v.valid)
    })
}

/// False when no validation has run yet; unvalidated is not the same as invalid.
pub fn validation_failed() -> Guard {
    Guard::on_first("validation_failed", |t| {
        t.metadata.latest_validation().map_or(false, |v| !v.valid)
    })
}

pub fn retry_eligible() -> Guard {
    Guard::on_first("retry_eligible", |t| t.retry_count < t.max_retries)
}

pub fn escalate_eligible() -> Guard {
    Guard::on_first("escalate_eligible", |t| t.retry_count >= t.max_retries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Severity, Token, TokenColor, ValidationResult, Violation};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_validation_guards() {
        let mut token = Token::new(json!({}), TokenColor::Validated);
        assert!(!has_validation_result().evaluate(&[&token]));
        assert!(!validation_failed().evaluate(&[&token]));

        token.push_validation(ValidationResult::from_violations(
            vec![Violation::new("no_self_loop", Severity::Error, "loop")],
            Utc::now(),
        ));
        assert!(has_validation_result().evaluate(&[&token]));
        assert!(validation_failed().evaluate(&[&token]));
        assert!(!validation_passed().evaluate(&[&token]));

        token.push_validation(ValidationResult::passed());
        assert!(validation_passed().evaluate(&[&token]));
    }

    #[test]
    fn test_retry_and_escalate_partition_the_budget() {
        let mut token = Token::new(json!({}), TokenColor::Invalid).with_max_retries(3);
        for retry in 0..=4 {
            token.retry_count = retry;
            let retry_ok = retry_eligible().evaluate(&[&token]);
            let escalate_ok = escalate_eligible().evaluate(&[&token]);
            assert_ne!(retry_ok, escalate_ok, "exactly one must hold at retry {}", retry);
            assert_eq!(retry_ok, retry < 3);
        }
    }
}
