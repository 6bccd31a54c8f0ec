// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Knowledge-graph proposal: the payload the validation and critique nets carry.
//!
//! Tokens hold their payload as opaque JSON. Guards and actions that need the
//! graph shape read it through [`GraphProposal::from_token`], which borrows the
//! JSON instead of cloning it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub node_type: Option<String>,
    pub confidence: f64,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub confidence: f64,
}

/// A batch of nodes and edges produced by a generator for one request.
///
/// `id` doubles as the correlation id: every regeneration of the same request
/// must come back with the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphProposal {
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub nodes: Vec<ProposedNode>,
    #[serde(default)]
    pub edges: Vec<ProposedEdge>,
    #[serde(default)]
    pub source_text: Option<String>,
}

impl GraphProposal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            source_text: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_node(mut self, id: &str, label: &str, confidence: f64) -> Self {
        self.nodes.push(ProposedNode {
            id: id.to_string(),
            label: label.to_string(),
            node_type: None,
            confidence,
            properties: BTreeMap::new(),
        });
        self
    }

    pub fn with_edge(mut self, id: &str, source: &str, target: &str, label: &str, confidence: f64) -> Self {
        self.edges.push(ProposedEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            confidence,
        });
        self
    }

    /// Reads the proposal out of a token payload without cloning it.
    pub fn from_token(token: &Token) -> Result<Self, serde_json::Error> {
        Self::deserialize(&token.payload)
    }

    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Node count plus edge count.
    pub fn structure_size(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// Highest confidence over all nodes and edges, `None` for an empty proposal.
    pub fn max_confidence(&self) -> Option<f64> {
        self.nodes
            .iter()
            .map(|n| n.confidence)
            .chain(self.edges.iter().map(|e| e.confidence))
            .fold(None, |max, c| match max {
                Some(m) if m >= c => Some(m),
                _ => Some(c),
            })
    }

    /// Scales every item's confidence by `factor`, rounded to two decimals.
    ///
    /// The result never exceeds the original confidence, whatever the factor.
    pub fn scale_confidence(&mut self, factor: f64) {
        let adjust = |original: f64| round2(original * factor).min(original);
        for node in &mut self.nodes {
            node.confidence = adjust(node.confidence);
        }
        for edge in &mut self.edges {
            edge.confidence = adjust(edge.confidence);
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_confidence_rounds_to_two_decimals() {
        let mut proposal = GraphProposal::new("p1")
            .with_node("n1", "Aspirin", 0.9)
            .with_node("n2", "Headache", 0.77)
            .with_edge("e1", "n1", "n2", "treats", 0.65);

        proposal.scale_confidence(0.8);

        assert_eq!(proposal.nodes[0].confidence, 0.72);
        assert_eq!(proposal.nodes[1].confidence, 0.62);
        assert_eq!(proposal.edges[0].confidence, 0.52);
    }

    #[test]
    fn test_scale_confidence_never_raises() {
        let mut proposal = GraphProposal::new("p1").with_node("n1", "A", 0.5);
        proposal.scale_confidence(1.0);
        assert_eq!(proposal.nodes[0].confidence, 0.5);

        let mut proposal = GraphProposal::new("p1").with_node("n1", "A", 0.333);
        proposal.scale_confidence(1.0);
        assert!(proposal.nodes[0].confidence <= 0.333);
    }

    #[test]
    fn test_max_confidence_spans_nodes_and_edges() {
        let proposal = GraphProposal::new("p1")
            .with_node("n1", "A", 0.4)
            .with_node("n2", "B", 0.6)
            .with_edge("e1", "n1", "n2", "rel", 0.95);
        assert_eq!(proposal.max_confidence(), Some(0.95));
        assert_eq!(GraphProposal::new("empty").max_confidence(), None);
    }
}
