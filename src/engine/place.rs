// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use uuid::Uuid;

use crate::token::{Token, TokenColor};

/// Static description of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceConfig {
    pub id: String,
    /// Colors this place takes; empty accepts every color
    pub accepted_colors: BTreeSet<TokenColor>,
    pub capacity: Option<usize>,
    /// Sinks never release a token once it arrives
    pub is_sink: bool,
    /// Where a net's new tokens are created
    pub is_source: bool,
}

impl PlaceConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            accepted_colors: BTreeSet::new(),
            capacity: None,
            is_sink: false,
            is_source: false,
        }
    }

    pub fn accepting<I>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = TokenColor>,
    {
        self.accepted_colors.extend(colors);
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn sink(mut self) -> Self {
        self.is_sink = true;
        self
    }

    pub fn source(mut self) -> Self {
        self.is_source = true;
        self
    }

    pub fn accepts_color(&self, color: TokenColor) -> bool {
        self.accepted_colors.is_empty() || self.accepted_colors.contains(&color)
    }
}

/// Point-in-time copy of a place for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSnapshot {
    pub config: PlaceConfig,
    pub tokens: Vec<Token>,
    pub count: usize,
}

/// A token container enforcing color, capacity and sink rules.
///
/// Places never change a token; they only hold it.
#[derive(Debug, Clone)]
pub struct Place {
    config: PlaceConfig,
    tokens: VecDeque<Token>,
}

impl Place {
    pub fn new(config: PlaceConfig) -> Self {
        Self {
            config,
            tokens: VecDeque::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &PlaceConfig {
        &self.config
    }

    pub fn is_sink(&self) -> bool {
        self.config.is_sink
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Room for `n` more tokens.
    pub fn has_room_for(&self, n: usize) -> bool {
        self.config.capacity.map_or(true, |cap| self.tokens.len() + n <= cap)
    }

    pub fn can_accept(&self, token: &Token) -> bool {
        self.config.accepts_color(token.color) && self.has_room_for(1)
    }

    /// Appends the token, or hands it back when color or capacity refuse it.
    pub fn try_push(&mut self, token: Token) -> Result<(), Token> {
        if !self.can_accept(&token) {
            return Err(token);
        }
        self.tokens.push_back(token);
        Ok(())
    }

    /// Appends the token; `false` when refused. The refused token is dropped.
    pub fn push(&mut self, token: Token) -> bool {
        self.try_push(token).is_ok()
    }

    /// First `n` tokens (all when `None`) without removing them.
    pub fn pull(&self, n: Option<usize>) -> Vec<&Token> {
        let n = n.unwrap_or(self.tokens.len());
        self.tokens.iter().take(n).collect()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Removes and returns the first `n` tokens (all when `None`). Sinks
    /// always return nothing.
    pub fn take(&mut self, n: Option<usize>) -> Vec<Token> {
        if self.config.is_sink {
            return Vec::new();
        }
        let n = n.unwrap_or(self.tokens.len()).min(self.tokens.len());
        self.tokens.drain(..n).collect()
    }

    /// Removes everything; no-op on sinks.
    pub fn clear(&mut self) {
        if !self.config.is_sink {
            self.tokens.clear();
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn snapshot(&self) -> PlaceSnapshot {
        PlaceSnapshot {
            config: self.config.clone(),
            tokens: self.tokens.iter().cloned().collect(),
            count: self.tokens.len(),
        }
    }

    /// Puts a token taken by a failed fire back at the front, bypassing checks.
    pub(crate) fn restore(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Empties the place, sinks included.
    pub(crate) fn reset(&mut self) {
        self.tokens.clear();
    }

    /// Removes the token with `id`. Sinks never release tokens.
    pub(crate) fn remove(&mut self, id: Uuid) -> Option<Token> {
        if self.config.is_sink {
            return None;
        }
        let index = self.tokens.iter().position(|t| t.id() == id)?;
        self.tokens.remove(index)
    }
}
