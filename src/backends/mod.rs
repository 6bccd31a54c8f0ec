// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Collaborator and store backends for the AXIOM workflow engine.
//!
//! The nets only talk to collaborators through the traits in
//! [`crate::traits`]. This module provides implementations that need no
//! external service.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process, deterministic collaborators:
//! - **StructuralValidator**: schema and constraint rules from the guard library
//! - **FeedbackRegenerator**: applies remove/merge corrections from feedback
//! - **HeuristicCritic**: argues against low-confidence items
//! - **LogCommitter**: commits by writing a structured log line
//! - **InMemoryTokenStore**: full token store API, including retention cleanup
//! - **Use Case**: the `axiom` binary, demos, local runs
//!
//! ## Stub Backend (Test-Only)
//! Scripted collaborators for engine and net tests (only available in test builds):
//! - **RecolorAction / FailingAction**: minimal transition actions
//! - **ScriptedValidator**: replays a fixed sequence of validation results
//! - **RecordingCommitter / ScriptedCritic / EchoCouncil**: record or script answers
//! - **FailingStore**: a store that refuses every call
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ```rust
//! use axiom::backends::local::StructuralValidator;
//! use axiom::token::GraphProposal;
//! use axiom::traits::Validator;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let proposal = GraphProposal::new("req-1").with_node("a", "Aspirin", 0.9);
//! let result = StructuralValidator.validate(&proposal).await?;
//! assert!(result.valid);
//! # Ok(())
//! # }
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
