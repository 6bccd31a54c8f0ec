// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;
use uuid::Uuid;

/// Background save of a token failed. Not retried.
///
/// # Log Level
/// `warn!` - The workflow continues without the audit copy
pub struct PersistenceFailed<'a> {
    pub token_id: Uuid,
    pub error: &'a dyn std::error::Error,
}

impl Display for PersistenceFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to persist token {}: {}", self.token_id, self.error)
    }
}

impl StructuredLog for PersistenceFailed<'_> {
    fn log(&self) {
        tracing::warn!(token_id = %self.token_id, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "persistence_failed",
            span_name = name,
            token_id = %self.token_id,
            error = %self.error,
        )
    }
}

/// No async runtime available, so the save was skipped.
///
/// # Log Level
/// `debug!`
pub struct PersistenceSkipped {
    pub token_id: Uuid,
}

impl Display for PersistenceSkipped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No runtime to persist token {}; skipped", self.token_id)
    }
}

impl StructuredLog for PersistenceSkipped {
    fn log(&self) {
        tracing::debug!(token_id = %self.token_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("persistence_skipped", span_name = name, token_id = %self.token_id)
    }
}

/// Retention purge finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RetentionCleanup {
    pub removed: usize,
    pub retention_days: u32,
}

impl Display for RetentionCleanup {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed {} token(s) older than {} day(s)",
            self.removed, self.retention_days
        )
    }
}

impl StructuredLog for RetentionCleanup {
    fn log(&self) {
        tracing::info!(removed = self.removed, retention_days = self.retention_days, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "retention_cleanup",
            span_name = name,
            removed = self.removed,
            retention_days = self.retention_days,
        )
    }
}
