//! Common test utilities for building cache group snapshots and topologies.
use cdn_topology::prelude::*;

/// A snapshot with one cache group per tier, every group staffed with servers.
///
/// Also contains `edge-2` and `mid-2` for multi-node shapes, and two empty
/// groups (`empty-edge`, `empty-origin`) with no servers.
#[allow(dead_code)]
pub fn create_snapshot() -> DirectorySnapshot {
    DirectorySnapshot::new()
        .with_cache_group("origin", Tier::Origin, 1)
        .with_cache_group("origin-2", Tier::Origin, 1)
        .with_cache_group("mid", Tier::Mid, 2)
        .with_cache_group("mid-2", Tier::Mid, 2)
        .with_cache_group("edge", Tier::Edge, 4)
        .with_cache_group("edge-2", Tier::Edge, 4)
        .with_cache_group("other", Tier::Other, 1)
        .with_cache_group("empty-edge", Tier::Edge, 0)
        .with_cache_group("empty-origin", Tier::Origin, 0)
}

/// Shorthand for a flat node.
#[allow(dead_code)]
pub fn node(name: &str, parents: &[usize]) -> FlatTopologyNode {
    FlatTopologyNode::new(name, parents.to_vec())
}

#[allow(dead_code)]
pub fn topology(nodes: Vec<FlatTopologyNode>) -> FlatTopology {
    FlatTopology::new("test-topology", "", nodes)
}

/// `edge -> [mid, origin]`, `mid -> [origin]`, `origin` as the root.
#[allow(dead_code)]
pub fn create_three_tier_topology() -> FlatTopology {
    FlatTopology::new(
        "three-tier",
        "edge with a secondary origin",
        vec![
            node("edge", &[1, 2]),
            node("mid", &[2]),
            node("origin", &[]),
        ],
    )
}

/// Two origins, two mids and two edges, with secondary parents crossing trees.
///
/// ```text
/// origin            origin-2
///   mid               mid-2
///     edge (mid-2)      edge-2 (mid)
/// ```
#[allow(dead_code)]
pub fn create_two_tree_topology() -> FlatTopology {
    FlatTopology::new(
        "two-trees",
        "",
        vec![
            node("edge-2", &[3, 5]),
            node("origin", &[]),
            node("edge", &[5, 3]),
            node("mid-2", &[4]),
            node("origin-2", &[]),
            node("mid", &[1]),
        ],
    )
}
