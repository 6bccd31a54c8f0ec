// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors reported by a `TokenStore` implementation.
///
/// The engine never propagates these; it logs them and moves on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize token {token_id}: {source}")]
    Serialization {
        token_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}
