// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Priority arbitration between simultaneously enabled transitions.
//!
//! Candidates are ordered by:
//! 1. **Priority** (higher first)
//! 2. **Registration order** (earlier first, so ties are deterministic)
//!
//! ```rust
//! use axiom::engine::arbitration::{Arbiter, Candidate};
//!
//! let mut arbiter = Arbiter::new();
//! arbiter.push(Candidate::new(0, "reject", 10));
//! arbiter.push(Candidate::new(1, "accept", 20));
//!
//! assert_eq!(arbiter.winner().map(|c| c.transition_id), Some("accept".to_string()));
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An enabled transition competing to fire this step.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position in registration order
    pub index: usize,
    pub transition_id: String,
    pub priority: i32,
}

impl Candidate {
    pub fn new(index: usize, transition_id: impl Into<String>, priority: i32) -> Self {
        Self {
            index,
            transition_id: transition_id.into(),
            priority,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: higher priority pops first, then the
        // earlier registration.
        match self.priority.cmp(&other.priority) {
            Ordering::Equal => other.index.cmp(&self.index),
            other_ordering => other_ordering,
        }
    }
}

#[derive(Debug, Default)]
pub struct Arbiter {
    heap: BinaryHeap<Candidate>,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.heap.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The single candidate allowed to fire.
    pub fn winner(self) -> Option<Candidate> {
        self.heap.into_iter().max()
    }

    /// All candidates in firing preference order.
    pub fn ranked(self) -> Vec<Candidate> {
        let mut ranked = self.heap.into_sorted_vec();
        ranked.reverse();
        ranked
    }
}

impl FromIterator<Candidate> for Arbiter {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self {
            heap: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_priority_wins() {
        let arbiter: Arbiter = vec![Candidate::new(0, "low", 10), Candidate::new(1, "high", 20)]
            .into_iter()
            .collect();
        assert_eq!(arbiter.winner().unwrap().transition_id, "high");
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let arbiter: Arbiter = vec![
            Candidate::new(2, "third", 0),
            Candidate::new(0, "first", 0),
            Candidate::new(1, "second", 0),
        ]
        .into_iter()
        .collect();

        let ids: Vec<_> = arbiter.ranked().into_iter().map(|c| c.transition_id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_has_no_winner() {
        assert!(Arbiter::new().winner().is_none());
    }
}
