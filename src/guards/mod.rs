// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guard library: pure, synchronous, total predicates over the tokens a
//! transition would consume.
//!
//! Guards never perform I/O. Anything a guard needs that must be fetched
//! asynchronously is attached to token metadata by an earlier action.
//! Malformed payloads make a guard return `false`, never panic.

use std::fmt;
use std::sync::Arc;

use crate::token::{GraphProposal, Token};

pub mod constraint;
pub mod critique;
pub mod decision;
pub mod existence;
pub mod schema;
pub mod semantic;

type Predicate = dyn Fn(&[&Token]) -> bool + Send + Sync;

/// A named predicate. The id is what appears in guard-result audit maps.
#[derive(Clone)]
pub struct Guard {
    id: String,
    predicate: Arc<Predicate>,
}

impl Guard {
    pub fn new<F>(id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[&Token]) -> bool + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Guard over the first token only; false when there is none.
    pub fn on_first<F>(id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        Self::new(id, move |tokens| tokens.first().map_or(false, |t| predicate(t)))
    }

    /// Guard over the first token's payload read as a graph proposal; false
    /// when absent or unreadable.
    pub fn on_proposal<F>(id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&GraphProposal) -> bool + Send + Sync + 'static,
    {
        Self::on_first(id, move |token| {
            GraphProposal::from_token(token).map_or(false, |p| predicate(&p))
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn evaluate(&self, tokens: &[&Token]) -> bool {
        (self.predicate)(tokens)
    }

    pub fn and(self, other: Guard) -> Guard {
        let id = format!("({} && {})", self.id, other.id);
        Guard::new(id, move |tokens| self.evaluate(tokens) && other.evaluate(tokens))
    }

    pub fn or(self, other: Guard) -> Guard {
        let id = format!("({} || {})", self.id, other.id);
        Guard::new(id, move |tokens| self.evaluate(tokens) || other.evaluate(tokens))
    }

    pub fn not(self) -> Guard {
        let id = format!("!{}", self.id);
        Guard::new(id, move |tokens| !self.evaluate(tokens))
    }

    /// True when every guard is true; true for an empty list.
    pub fn all(id: impl Into<String>, guards: Vec<Guard>) -> Guard {
        Guard::new(id, move |tokens| guards.iter().all(|g| g.evaluate(tokens)))
    }

    /// True when any guard is true; false for an empty list.
    pub fn any(id: impl Into<String>, guards: Vec<Guard>) -> Guard {
        Guard::new(id, move |tokens| guards.iter().any(|g| g.evaluate(tokens)))
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("id", &self.id).finish()
    }
}
