use crate::directory::{CacheGroupRef, Tier};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

mod builder;
pub mod cycles;
pub mod tiers;

pub use builder::{GraphBuilder, MAX_PARENTS};

/// The two kinds of parent relationship a node can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Primary,
    Secondary,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Primary => f.write_str("primary"),
            EdgeKind::Secondary => f.write_str("secondary"),
        }
    }
}

/// A non-fatal finding produced while building a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyWarning {
    /// An Edge-tier cache group fetches from another Edge-tier cache group.
    EdgeParent {
        child: String,
        parent: String,
        kind: EdgeKind,
    },
}

impl fmt::Display for TopologyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyWarning::EdgeParent {
                child,
                parent,
                kind,
            } => write!(
                f,
                "cachegroup '{}' uses EDGE cachegroup '{}' as its {} parent",
                child, parent, kind
            ),
        }
    }
}

/// A resolved topology member and its (at most two) outgoing parent edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub cache_group: CacheGroupRef,
    pub primary_parent: Option<usize>,
    pub secondary_parent: Option<usize>,
}

impl GraphNode {
    pub fn name(&self) -> &str {
        &self.cache_group.name
    }

    pub fn tier(&self) -> Tier {
        self.cache_group.tier
    }
}

/// The canonical in-memory form of a topology: nodes keyed by their position in
/// the flat representation, with primary and secondary parent edges.
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    nodes: Vec<GraphNode>,
    /// Primary children of each node, in original array order.
    children: Vec<Vec<usize>>,
    index_by_name: AHashMap<String, usize>,
    warnings: Vec<TopologyWarning>,
}

impl TopologyGraph {
    pub(crate) fn from_nodes(nodes: Vec<GraphNode>) -> Self {
        let mut children = vec![Vec::new(); nodes.len()];
        let mut index_by_name = AHashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.primary_parent {
                children[parent].push(index);
            }
            index_by_name.insert(node.name().to_string(), index);
        }
        Self {
            nodes,
            children,
            index_by_name,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn set_warnings(&mut self, warnings: Vec<TopologyWarning>) {
        self.warnings = warnings;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn warnings(&self) -> &[TopologyWarning] {
        &self.warnings
    }

    /// Nodes without a primary parent, in original array order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.primary_parent.is_none())
            .map(|(i, _)| i)
    }

    pub fn primary_children(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes that name `index` as their secondary parent.
    pub fn secondary_children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.secondary_parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Every `(child, parent, kind)` edge, primary before secondary for each node.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, EdgeKind)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(child, node)| {
            let primary = node.primary_parent.map(|p| (child, p, EdgeKind::Primary));
            let secondary = node
                .secondary_parent
                .map(|p| (child, p, EdgeKind::Secondary));
            primary.into_iter().chain(secondary)
        })
    }

    /// Child-to-parent adjacency over primary edges only.
    pub fn primary_adjacency(&self) -> Vec<Vec<usize>> {
        self.nodes
            .iter()
            .map(|n| n.primary_parent.into_iter().collect())
            .collect()
    }

    /// Child-to-parent adjacency over both edge kinds.
    pub fn full_adjacency(&self) -> Vec<Vec<usize>> {
        self.nodes
            .iter()
            .map(|n| {
                n.primary_parent
                    .into_iter()
                    .chain(n.secondary_parent)
                    .collect()
            })
            .collect()
    }

    /// Edges labelled by cache group name, independent of node positions.
    pub fn edge_set(&self) -> BTreeSet<(String, String, EdgeKind)> {
        self.edges()
            .map(|(child, parent, kind)| {
                (
                    self.nodes[child].name().to_string(),
                    self.nodes[parent].name().to_string(),
                    kind,
                )
            })
            .collect()
    }

    pub fn membership(&self) -> BTreeMap<String, Tier> {
        self.nodes
            .iter()
            .map(|n| (n.name().to_string(), n.tier()))
            .collect()
    }

    /// Two graphs are equivalent when they have the same members, tiers and
    /// labelled edges, regardless of node ordering.
    pub fn is_equivalent(&self, other: &TopologyGraph) -> bool {
        self.membership() == other.membership() && self.edge_set() == other.edge_set()
    }
}
