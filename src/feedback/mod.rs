// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Corrective feedback: turns validation failures into guidance for the next
//! generation attempt instead of a bare rejection.

mod builder;
mod prompt;
mod types;

pub use builder::{action_for_fix, describe_rule, FeedbackBuilder};
pub use prompt::format_regeneration_prompt;
pub use types::{CorrectionAction, CorrectionFeedback, ValidationLevel};
