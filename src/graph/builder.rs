use super::cycles::find_cycle;
use super::tiers::{edge_parent_warnings, tier_violations};
use super::{GraphNode, TopologyGraph};
use crate::directory::{CacheGroupDirectory, ServerInventory};
use crate::error::{IndexFault, TopologyError};
use crate::topology::{FlatTopology, FlatTopologyNode};
use ahash::AHashSet;
use tracing::{debug, warn};

/// The maximum number of parents (primary + secondary) a node may declare.
pub const MAX_PARENTS: usize = 2;

/// Parses a [`FlatTopology`] into a [`TopologyGraph`], rejecting anything that
/// is not a well-formed topology.
pub struct GraphBuilder<'a> {
    directory: &'a dyn CacheGroupDirectory,
    inventory: &'a dyn ServerInventory,
    require_servers: bool,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(directory: &'a dyn CacheGroupDirectory, inventory: &'a dyn ServerInventory) -> Self {
        Self {
            directory,
            inventory,
            require_servers: true,
        }
    }

    /// Whether every member cache group must have at least one server.
    pub fn require_servers(mut self, require: bool) -> Self {
        self.require_servers = require;
        self
    }

    /// Builds the graph, stopping at the first violation.
    pub fn build(&self, topology: &FlatTopology) -> Result<TopologyGraph, TopologyError> {
        debug!(
            topology = %topology.name,
            nodes = topology.nodes.len(),
            "building topology graph"
        );
        if let Some(err) = self.structural_faults(topology).into_iter().next() {
            return Err(err);
        }
        let mut graph = self.resolve(topology)?;
        if let Some(err) = self.shape_faults(&graph).into_iter().next() {
            return Err(err);
        }
        self.attach_warnings(&mut graph);
        Ok(graph)
    }

    /// Runs every check that can be run independently and returns all violations.
    ///
    /// The graph is returned when the node list was well-formed enough to build
    /// one, even if later shape checks failed.
    pub fn collect(&self, topology: &FlatTopology) -> (Option<TopologyGraph>, Vec<TopologyError>) {
        let structural = self.structural_faults(topology);
        if !structural.is_empty() {
            return (None, structural);
        }
        let unknown = self.unknown_cache_groups(topology);
        if !unknown.is_empty() {
            return (None, unknown);
        }
        match self.resolve(topology) {
            Ok(mut graph) => {
                let faults = self.shape_faults(&graph);
                self.attach_warnings(&mut graph);
                (Some(graph), faults)
            }
            Err(err) => (None, vec![err]),
        }
    }

    /// Emptiness, index well-formedness and name uniqueness.
    fn structural_faults(&self, topology: &FlatTopology) -> Vec<TopologyError> {
        if topology.nodes.is_empty() {
            return vec![TopologyError::EmptyTopology { found: 0 }];
        }
        let mut faults = check_parent_indices(&topology.nodes);
        faults.extend(check_unique_names(&topology.nodes));
        faults
    }

    /// Resolves every node through the directory and wires up its edges.
    fn resolve(&self, topology: &FlatTopology) -> Result<TopologyGraph, TopologyError> {
        let nodes = topology
            .nodes
            .iter()
            .map(|node| {
                let cache_group = self.directory.lookup(&node.cache_group_name).ok_or_else(|| {
                    TopologyError::UnknownCacheGroup {
                        name: node.cache_group_name.clone(),
                    }
                })?;
                Ok(GraphNode {
                    cache_group,
                    primary_parent: node.primary_parent(),
                    secondary_parent: node.secondary_parent(),
                })
            })
            .collect::<Result<Vec<_>, TopologyError>>()?;
        Ok(TopologyGraph::from_nodes(nodes))
    }

    fn unknown_cache_groups(&self, topology: &FlatTopology) -> Vec<TopologyError> {
        topology
            .nodes
            .iter()
            .filter(|node| self.directory.lookup(&node.cache_group_name).is_none())
            .map(|node| TopologyError::UnknownCacheGroup {
                name: node.cache_group_name.clone(),
            })
            .collect()
    }

    /// Cycles, tier ordering and server membership, in that order.
    fn shape_faults(&self, graph: &TopologyGraph) -> Vec<TopologyError> {
        let mut faults = Vec::new();
        let cycle = find_cycle(&graph.primary_adjacency())
            .or_else(|| find_cycle(&graph.full_adjacency()));
        if let Some(cycle) = cycle {
            faults.push(TopologyError::CyclicTopology {
                cycle: cycle
                    .into_iter()
                    .map(|i| graph.nodes()[i].name().to_string())
                    .collect(),
            });
        }
        faults.extend(tier_violations(graph));
        if self.require_servers {
            if let Some(err) = self.empty_cache_groups(graph) {
                faults.push(err);
            }
        }
        faults
    }

    /// Collects every member without servers into a single error.
    fn empty_cache_groups(&self, graph: &TopologyGraph) -> Option<TopologyError> {
        let names: Vec<String> = graph
            .nodes()
            .iter()
            .map(GraphNode::name)
            .filter(|name| !self.inventory.has_servers(name))
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(TopologyError::EmptyCacheGroup { names })
        }
    }

    fn attach_warnings(&self, graph: &mut TopologyGraph) {
        let warnings = edge_parent_warnings(graph);
        for warning in &warnings {
            warn!("{}", warning);
        }
        graph.set_warnings(warnings);
    }
}

/// Checks parent counts, index ranges, self references and repeated parents.
fn check_parent_indices(nodes: &[FlatTopologyNode]) -> Vec<TopologyError> {
    let len = nodes.len();
    let mut faults = Vec::new();
    for (node_index, node) in nodes.iter().enumerate() {
        if node.parent_indices.len() > MAX_PARENTS {
            faults.push(TopologyError::TooManyParents {
                node: node_index,
                cache_group: node.cache_group_name.clone(),
                count: node.parent_indices.len(),
            });
        }
        for &index in &node.parent_indices {
            let fault = if index >= len {
                IndexFault::OutOfRange { len }
            } else if index == node_index {
                IndexFault::SelfParent
            } else {
                continue;
            };
            faults.push(TopologyError::MalformedIndex {
                node: node_index,
                index,
                fault,
            });
        }
        if let (Some(primary), Some(secondary)) = (node.primary_parent(), node.secondary_parent()) {
            if primary == secondary && primary < len && primary != node_index {
                faults.push(TopologyError::DuplicateParents {
                    cache_group: node.cache_group_name.clone(),
                    parent: nodes[primary].cache_group_name.clone(),
                });
            }
        }
    }
    faults
}

fn check_unique_names(nodes: &[FlatTopologyNode]) -> Vec<TopologyError> {
    let mut seen = AHashSet::with_capacity(nodes.len());
    let mut reported = AHashSet::new();
    let mut faults = Vec::new();
    for node in nodes {
        let name = node.cache_group_name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            faults.push(TopologyError::DuplicateCacheGroup {
                name: name.to_string(),
            });
        }
    }
    faults
}
