// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lenient reading of critique model output.
//!
//! Models wrap JSON in prose or code fences, drop fields and invent severity
//! names. Anything unreadable degrades to the neutral result (no counter
//! arguments, survival 1.0) rather than failing the workflow.

use serde::Deserialize;

use crate::critique::{ArgumentSeverity, CounterArgument, CritiqueResult};
use crate::observability::messages::{critique::CritiqueResponseMalformed, StructuredLog};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCritique {
    #[serde(alias = "counterArguments")]
    counter_arguments: Vec<RawArgument>,
    #[serde(alias = "blindSpots")]
    blind_spots: Vec<String>,
    #[serde(alias = "riskFactors")]
    risk_factors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArgument {
    target: String,
    #[serde(alias = "claim", alias = "text")]
    argument: String,
    severity: String,
    #[serde(alias = "itemScore")]
    score: Option<f64>,
}

fn parse_severity(raw: &str) -> ArgumentSeverity {
    match raw.trim().to_ascii_lowercase().as_str() {
        "major" | "high" | "critical" => ArgumentSeverity::Major,
        "moderate" | "medium" => ArgumentSeverity::Moderate,
        _ => ArgumentSeverity::Minor,
    }
}

/// Slice from the first `{` to the last `}`, if any.
fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Reads a critique model response, falling back to the neutral result.
///
/// The survival score is always recomputed from the arguments; a score the
/// model states itself is ignored.
pub fn parse_critique_response(raw: &str) -> CritiqueResult {
    let parsed = serde_json::from_str::<RawCritique>(raw.trim()).or_else(|first_err| {
        json_object_span(raw)
            .ok_or(first_err)
            .and_then(serde_json::from_str::<RawCritique>)
    });

    let raw_critique = match parsed {
        Ok(c) => c,
        Err(e) => {
            CritiqueResponseMalformed {
                response_len: raw.len(),
                error: &e,
            }
            .log();
            return CritiqueResult::neutral();
        }
    };

    let arguments = raw_critique
        .counter_arguments
        .into_iter()
        .filter(|a| !a.argument.trim().is_empty())
        .map(|a| {
            let severity = parse_severity(&a.severity);
            CounterArgument {
                target: a.target,
                argument: a.argument,
                severity,
                score: a.score.unwrap_or(0.5).clamp(0.0, 1.0),
            }
        })
        .collect();

    CritiqueResult::from_arguments(arguments, raw_critique.blind_spots, raw_critique.risk_factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critique::Recommendation;

    #[test]
    fn test_parses_plain_json() {
        let raw = r#"{
            "counter_arguments": [
                {"target": "e1", "argument": "correlation is not causation", "severity": "major", "score": 0.4}
            ],
            "blind_spots": ["dosage"],
            "risk_factors": ["medical advice"]
        }"#;
        let result = parse_critique_response(raw);
        assert_eq!(result.counter_arguments.len(), 1);
        assert_eq!(result.counter_arguments[0].severity, ArgumentSeverity::Major);
        assert!((result.survival_score - 0.4).abs() < 1e-9);
        assert_eq!(result.blind_spots, vec!["dosage".to_string()]);
    }

    #[test]
    fn test_parses_json_wrapped_in_prose_with_camel_case() {
        let raw = "Here is my critique:\n```json\n{\"counterArguments\": [{\"target\": \"n1\", \"claim\": \"too broad\", \"severity\": \"medium\", \"itemScore\": 0.9}]}\n```";
        let result = parse_critique_response(raw);
        assert_eq!(result.counter_arguments.len(), 1);
        assert_eq!(result.counter_arguments[0].severity, ArgumentSeverity::Moderate);
        assert_eq!(result.counter_arguments[0].argument, "too broad");
    }

    #[test]
    fn test_garbage_degrades_to_neutral() {
        let result = parse_critique_response("I refuse to answer in JSON.");
        assert_eq!(result.survival_score, 1.0);
        assert!(result.counter_arguments.is_empty());
        assert_eq!(result.recommendation, Recommendation::Accept);
    }
}
