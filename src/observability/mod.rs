// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational log lines in AXIOM go through message
//! structs in [`messages`]. Each message implements `Display` for the human
//! readable line and [`messages::StructuredLog`] to emit a leveled `tracing`
//! event carrying the same data as structured fields.
//!
//! Messages are organized by subsystem:
//! * `messages::config` - configuration loading and validation
//! * `messages::engine` - engine lifecycle and the run loop
//! * `messages::transition` - firing, token placement and routing
//! * `messages::store` - token store persistence
//! * `messages::critique` - adversarial critique outcomes
//! * `messages::workflow` - per-request workflow results
//!
//! Subscriber setup belongs to the binary; the library only emits.
//!
//! # Usage
//!
//! ```rust
//! use axiom::observability::messages::{engine::StepLimitReached, StructuredLog};
//!
//! let msg = StepLimitReached { max_steps: 100 };
//! msg.log();
//! ```

pub mod messages;
