// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // collaborator and store backends
pub mod config;     // config loading + validation
pub mod critique;   // critique results, survival score
pub mod engine;     // petri net interpreter
pub mod errors;     // error handling
pub mod feedback;   // correction feedback
pub mod guards;     // guard library
pub mod nets;       // bundled workflow nets
pub mod observability;
pub mod token;      // token model
pub mod traits;     // unified abstractions
