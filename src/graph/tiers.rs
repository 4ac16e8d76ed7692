use super::{TopologyGraph, TopologyWarning};
use crate::directory::Tier;
use crate::error::TopologyError;

/// Checks every primary and secondary edge against the tier order
/// `Edge < Mid < Origin < Other`. A child may only fetch from a parent of the
/// same or a higher tier.
pub fn tier_violations(graph: &TopologyGraph) -> Vec<TopologyError> {
    let nodes = graph.nodes();
    graph
        .edges()
        .filter(|&(child, parent, _)| !nodes[child].tier().may_parent_to(nodes[parent].tier()))
        .map(|(child, parent, kind)| TopologyError::InvalidTierOrdering {
            child: nodes[child].name().to_string(),
            child_tier: nodes[child].tier(),
            parent: nodes[parent].name().to_string(),
            parent_tier: nodes[parent].tier(),
            kind,
        })
        .collect()
}

/// Legal but unusual edges: Edge-tier caches parented by other Edge-tier caches.
pub fn edge_parent_warnings(graph: &TopologyGraph) -> Vec<TopologyWarning> {
    let nodes = graph.nodes();
    graph
        .edges()
        .filter(|&(child, parent, _)| {
            nodes[child].tier() == Tier::Edge && nodes[parent].tier() == Tier::Edge
        })
        .map(|(child, parent, kind)| TopologyWarning::EdgeParent {
            child: nodes[child].name().to_string(),
            parent: nodes[parent].name().to_string(),
            kind,
        })
        .collect()
}
