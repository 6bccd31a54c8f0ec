// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::EventBus;
use crate::errors::ActionError;
use crate::token::{Token, TokenColor};

/// What an action sees about the firing it runs inside.
#[derive(Debug, Clone)]
pub struct FireContext {
    pub transition_id: String,
    /// Engine step number this fire will be recorded under
    pub step: u64,
    /// Actions publish domain events (critique outcomes) here
    pub events: EventBus,
}

/// Tokens an action hands back for routing, plus an optional reason that
/// replaces the engine-supplied one in the audit record.
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    pub tokens: Vec<Token>,
    pub reason: Option<String>,
}

impl ActionOutput {
    pub fn single(token: Token) -> Self {
        Self {
            tokens: vec![token],
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// The work a transition does between taking and depositing tokens.
///
/// `emits` must list every color `execute` can return; the engine builds its
/// color routing table from it when the transition is registered.
#[async_trait]
pub trait TransitionAction: Send + Sync {
    async fn execute(&self, inputs: Vec<Token>, ctx: &FireContext) -> Result<ActionOutput, ActionError>;

    fn emits(&self) -> Vec<TokenColor>;

    fn name(&self) -> &'static str;
}

/// Takes exactly one input token or fails with `TokenCount`.
pub(crate) fn single_input(inputs: Vec<Token>) -> Result<Token, ActionError> {
    let actual = inputs.len();
    let mut iter = inputs.into_iter();
    match (iter.next(), iter.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(ActionError::TokenCount { expected: 1, actual }),
    }
}
