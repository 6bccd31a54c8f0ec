// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::feedback::CorrectionFeedback;

/// Renders accumulated feedback as regeneration guidance for a generator.
///
/// Mandatory corrections (errors) come first, optional ones (warnings) after,
/// each list keeping history order. The footer states which attempt is next.
pub fn format_regeneration_prompt(
    feedback: &[CorrectionFeedback],
    attempt: u32,
    max_attempts: u32,
) -> String {
    let (required, optional): (Vec<&CorrectionFeedback>, Vec<&CorrectionFeedback>) =
        feedback.iter().partition(|f| f.is_mandatory());

    let mut out = String::from("The previous proposal did not pass validation.\n");

    if !required.is_empty() {
        out.push_str("\nREQUIRED corrections:\n");
        for (i, item) in required.iter().enumerate() {
            out.push_str(&format_item(i + 1, item));
        }
    }

    if !optional.is_empty() {
        out.push_str("\nOPTIONAL improvements:\n");
        for (i, item) in optional.iter().enumerate() {
            out.push_str(&format_item(i + 1, item));
        }
    }

    out.push_str(&format!("\nAttempt {} of {}.\n", attempt, max_attempts));
    out
}

fn format_item(index: usize, item: &CorrectionFeedback) -> String {
    let mut line = format!(
        "{}. [L{} {}] {} ({})",
        index,
        item.level.number(),
        item.rule_id,
        item.message,
        item.action.as_str()
    );
    if let Some(subject) = &item.subject {
        line.push_str(&format!(" on '{}'", subject));
    }
    line.push('\n');
    line.push_str(&format!("   constraint: {}\n", item.constraint));
    if let Some(expected) = &item.expected {
        line.push_str(&format!("   expected: {}\n", expected));
    }
    line
}
