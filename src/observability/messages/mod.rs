// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable
//! output and [`StructuredLog`] to emit it with structured fields at the level
//! the message calls for.

use tracing::Span;

pub mod backend;
pub mod config;
pub mod critique;
pub mod engine;
pub mod store;
pub mod transition;
pub mod workflow;

/// A log message that knows its own level and fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
