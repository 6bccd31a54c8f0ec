// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validator result types attached to tokens as the validation trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Must be fixed before the proposal can commit
    Error,
    /// Should be fixed, does not block commit
    Warning,
    Info,
}

/// Fix category suggested by the validator for a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    UpdateValue,
    AddField,
    ChangeType,
    RemoveElement,
    RemoveDuplicate,
    MergeNodes,
    RewordLabel,
    Clarify,
}

/// A single rule violation reported by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Node or edge id the violation points at
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub actual: Option<Value>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub fix_type: Option<FixType>,
}

impl Violation {
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            subject: None,
            actual: None,
            suggestion: None,
            fix_type: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix_type(mut self, fix_type: FixType) -> Self {
        self.fix_type = Some(fix_type);
        self
    }
}

/// Outcome of one validator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub level1_passed: bool,
    pub level2_passed: bool,
    pub level3_passed: bool,
    pub violations: Vec<Violation>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ValidationResult {
    /// A passing result with no violations.
    pub fn passed() -> Self {
        let now = Utc::now();
        Self {
            valid: true,
            level1_passed: true,
            level2_passed: true,
            level3_passed: true,
            violations: Vec::new(),
            started_at: now,
            completed_at: now,
        }
    }

    /// Builds a result from violations; the result is valid iff none is an error.
    ///
    /// Level flags are derived from the violations of that level's severity
    /// `Error`, using the same rule-id classification the feedback builder uses.
    pub fn from_violations(violations: Vec<Violation>, started_at: DateTime<Utc>) -> Self {
        use crate::feedback::ValidationLevel;

        let failed_at = |level: ValidationLevel| {
            violations.iter().any(|v| {
                v.severity == Severity::Error && ValidationLevel::classify(&v.rule_id) == level
            })
        };

        let level1_passed = !failed_at(ValidationLevel::Schema);
        let level2_passed = !failed_at(ValidationLevel::Constraint);
        let level3_passed = !failed_at(ValidationLevel::Semantic);

        Self {
            valid: level1_passed && level2_passed && level3_passed,
            level1_passed,
            level2_passed,
            level3_passed,
            violations,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}
