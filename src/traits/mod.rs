// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod action;
pub mod collaborators;
pub mod store;

pub use action::{ActionOutput, FireContext, TransitionAction};
pub use collaborators::{Committer, CouncilAgent, CritiqueAgent, Regenerator, Validator};
pub use store::{TokenQuery, TokenStore};
