// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod committer;
pub mod critic;
pub mod feedback_regenerator;
pub mod memory_store;
pub mod structural_validator;

pub use committer::LogCommitter;
pub use critic::HeuristicCritic;
pub use feedback_regenerator::FeedbackRegenerator;
pub use memory_store::InMemoryTokenStore;
pub use structural_validator::StructuralValidator;
