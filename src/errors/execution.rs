// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for transition actions and engine execution.

use thiserror::Error;

use crate::token::TokenColor;

/// Failure inside a transition action.
///
/// Collaborator failures (validator, regenerator, committer, critic, council)
/// arrive as `anyhow::Error` and are kept as the source so the original chain
/// survives up to the caller.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Validator failed: {0}")]
    Validator(#[source] anyhow::Error),

    #[error("Regenerator failed: {0}")]
    Regenerator(#[source] anyhow::Error),

    #[error("Committer failed: {0}")]
    Committer(#[source] anyhow::Error),

    #[error("Critique agent failed: {0}")]
    Critique(#[source] anyhow::Error),

    #[error("Council agent failed: {0}")]
    Council(#[source] anyhow::Error),

    /// The token payload could not be read as the shape this action expects
    #[error("Malformed payload for {expected}: {source}")]
    MalformedPayload {
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A regenerated proposal came back under a different id
    #[error("Regeneration changed correlation id from '{expected}' to '{actual}'")]
    CorrelationMismatch { expected: String, actual: String },

    /// The action was handed a token set it cannot work with
    #[error("Action expected {expected} input token(s), got {actual}")]
    TokenCount { expected: usize, actual: usize },
}

/// Errors surfaced by `fire`, `step` and `run`.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Transition '{transition_id}' action failed: {source}")]
    ActionFailed {
        transition_id: String,
        #[source]
        source: ActionError,
    },

    #[error("Unknown place '{0}'")]
    UnknownPlace(String),

    #[error("Unknown transition '{0}'")]
    UnknownTransition(String),

    #[error("Transition '{0}' is not enabled")]
    NotEnabled(String),

    /// Audit records must always explain why a transition fired
    #[error("Transition '{0}' fired without a reason")]
    EmptyReason(String),

    /// The action produced a color outside its declared route table
    #[error("Transition '{transition_id}' produced undeclared color {color:?}")]
    UnroutableToken {
        transition_id: String,
        color: TokenColor,
    },

    /// The routed destination refused the token (capacity reached)
    #[error("Place '{place_id}' rejected token {token_id} from transition '{transition_id}'")]
    DepositRejected {
        transition_id: String,
        place_id: String,
        token_id: String,
    },

    /// `add_token` was given a token the place does not accept
    #[error("Place '{place_id}' rejected new token {token_id} with color {color:?}")]
    TokenRejected {
        place_id: String,
        token_id: String,
        color: TokenColor,
    },
}
