// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feedback::builder::describe_rule;
use crate::token::Severity;

/// Validation layer a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    Schema,
    Constraint,
    Semantic,
}

impl ValidationLevel {
    pub fn number(&self) -> u8 {
        match self {
            ValidationLevel::Schema => 1,
            ValidationLevel::Constraint => 2,
            ValidationLevel::Semantic => 3,
        }
    }
}

/// What the generator should do about a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionAction {
    Modify,
    Remove,
    Merge,
    Rephrase,
}

impl CorrectionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionAction::Modify => "modify",
            CorrectionAction::Remove => "remove",
            CorrectionAction::Merge => "merge",
            CorrectionAction::Rephrase => "rephrase",
        }
    }
}

/// Structured correction handed back to the generator on retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFeedback {
    pub level: ValidationLevel,
    pub rule_id: String,
    /// Human-readable statement of the violated constraint
    pub constraint: String,
    pub message: String,
    pub severity: Severity,
    pub subject: Option<String>,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub action: CorrectionAction,
    /// Retry count of the token when this feedback was produced
    pub attempt: u32,
}

impl CorrectionFeedback {
    /// Feedback authored outside the validator (reviewers, operators, tests).
    pub fn manual(
        level: ValidationLevel,
        rule_id: impl Into<String>,
        message: impl Into<String>,
        action: CorrectionAction,
    ) -> Self {
        let rule_id = rule_id.into();
        Self {
            level,
            constraint: describe_rule(&rule_id),
            rule_id,
            message: message.into(),
            severity: Severity::Error,
            subject: None,
            actual: None,
            expected: None,
            action,
            attempt: 0,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.severity == Severity::Error
    }
}
