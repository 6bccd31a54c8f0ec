// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Level 2 checks: structural invariants of a proposed graph.

use std::collections::HashSet;

use crate::guards::Guard;
use crate::token::{FixType, GraphProposal, Severity, Violation};

pub fn no_self_loops() -> Guard {
    Guard::on_proposal("no_self_loops", |p| self_loops(p).is_empty())
}

pub fn no_duplicate_edges() -> Guard {
    Guard::on_proposal("no_duplicate_edges", |p| duplicate_edges(p).is_empty())
}

pub fn references_consistent() -> Guard {
    Guard::on_proposal("references_consistent", |p| {
        dangling_references(p).is_empty() && duplicate_nodes(p).is_empty()
    })
}

pub fn constraints_hold() -> Guard {
    Guard::on_proposal("constraints_hold", |p| constraint_violations(p).is_empty())
}

/// Every constraint violation: self loops, duplicate edges, duplicate node
/// ids, then edges pointing at unknown nodes.
pub fn constraint_violations(proposal: &GraphProposal) -> Vec<Violation> {
    let mut violations = self_loops(proposal);
    violations.extend(duplicate_edges(proposal));
    violations.extend(duplicate_nodes(proposal));
    violations.extend(dangling_references(proposal));
    violations
}

fn self_loops(proposal: &GraphProposal) -> Vec<Violation> {
    proposal
        .edges
        .iter()
        .filter(|e| e.source == e.target)
        .map(|e| {
            Violation::new(
                "no_self_loop",
                Severity::Error,
                format!("edge '{}' connects '{}' to itself", e.id, e.source),
            )
            .with_subject(e.id.clone())
            .with_fix_type(FixType::RemoveElement)
        })
        .collect()
}

// Edges are duplicates when source, target and label all match.
fn duplicate_edges(proposal: &GraphProposal) -> Vec<Violation> {
    let mut seen = HashSet::new();
    proposal
        .edges
        .iter()
        .filter(|e| !seen.insert((e.source.as_str(), e.target.as_str(), e.label.as_str())))
        .map(|e| {
            Violation::new(
                "duplicate_edge",
                Severity::Error,
                format!("edge '{}' repeats {} -[{}]-> {}", e.id, e.source, e.label, e.target),
            )
            .with_subject(e.id.clone())
            .with_fix_type(FixType::RemoveDuplicate)
        })
        .collect()
}

fn duplicate_nodes(proposal: &GraphProposal) -> Vec<Violation> {
    let mut seen = HashSet::new();
    proposal
        .nodes
        .iter()
        .filter(|n| !seen.insert(n.id.as_str()))
        .map(|n| {
            Violation::new("duplicate_node", Severity::Error, format!("node id '{}' is used twice", n.id))
                .with_subject(n.id.clone())
                .with_fix_type(FixType::MergeNodes)
        })
        .collect()
}

fn dangling_references(proposal: &GraphProposal) -> Vec<Violation> {
    let node_ids: HashSet<&str> = proposal.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut violations = Vec::new();
    for edge in &proposal.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                violations.push(
                    Violation::new(
                        "dangling_reference",
                        Severity::Error,
                        format!("edge '{}' references unknown node '{}'", edge.id, endpoint),
                    )
                    .with_subject(edge.id.clone())
                    .with_fix_type(FixType::RemoveElement),
                );
            }
        }
    }
    violations
}
