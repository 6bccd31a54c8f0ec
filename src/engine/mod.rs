// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod arbitration;
pub mod control;
pub mod events;
mod persistence;
pub mod petri;
pub mod place;
pub mod run_result;
pub mod stats;
pub mod transition;
#[cfg(test)]
mod integration_tests;

pub use control::{EngineControl, EngineState};
pub use events::{EngineEvent, EngineEventKind, EventBus, EventData, EventSubscription};
pub use petri::PetriEngine;
pub use place::{Place, PlaceConfig, PlaceSnapshot};
pub use run_result::{HaltReason, RunOutcome, RunResult, RunSummary};
pub use stats::EngineStats;
pub use transition::{FireOutcome, Transition, TransitionConfig};
