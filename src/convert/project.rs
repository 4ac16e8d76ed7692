use crate::graph::TopologyGraph;
use crate::topology::{Forest, TreeNode};

/// Projects the primary-parent hierarchy of a graph into a forest.
///
/// Roots and children keep their original array order. Each node's secondary
/// edge becomes a by-name reference. Projection is total: every graph the
/// builder accepts has a forest.
pub fn project(graph: &TopologyGraph) -> Forest {
    graph.roots().map(|root| build_subtree(graph, root)).collect()
}

fn build_subtree(graph: &TopologyGraph, index: usize) -> TreeNode {
    let node = &graph.nodes()[index];
    TreeNode {
        cache_group_name: node.name().to_string(),
        secondary_parent_name: node
            .secondary_parent
            .and_then(|p| graph.node(p))
            .map(|p| p.name().to_string()),
        children: graph
            .primary_children(index)
            .iter()
            .map(|&child| build_subtree(graph, child))
            .collect(),
    }
}
