use crate::config::EngineConfig;
use crate::directory::{CacheGroupDirectory, ServerInventory, Tier};
use crate::error::TopologyError;
use crate::graph::{GraphBuilder, TopologyGraph};
use crate::topology::FlatTopology;
use tracing::debug;

/// Runs the graph builder's checks plus the invariants that only make sense for
/// a topology as a whole.
///
/// Every node of a built graph already has a primary-parent chain ending at a
/// root: indices are in range and the primary edges are acyclic. Roots used
/// only as secondary parents (a fallback origin, say) are therefore members
/// like any other.
pub struct Validator<'a> {
    directory: &'a dyn CacheGroupDirectory,
    inventory: &'a dyn ServerInventory,
    config: &'a EngineConfig,
}

impl<'a> Validator<'a> {
    pub fn new(
        directory: &'a dyn CacheGroupDirectory,
        inventory: &'a dyn ServerInventory,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            directory,
            inventory,
            config,
        }
    }

    fn graph_builder(&self) -> GraphBuilder<'a> {
        GraphBuilder::new(self.directory, self.inventory).require_servers(self.config.require_servers)
    }

    /// Validates the topology, returning its graph or the first violation found.
    pub fn validate(&self, topology: &FlatTopology) -> Result<TopologyGraph, TopologyError> {
        let graph = self.graph_builder().build(topology)?;
        if let Some(err) = self.topology_faults(topology, &graph).into_iter().next() {
            return Err(err);
        }
        debug!(topology = %topology.name, nodes = graph.len(), "topology is valid");
        Ok(graph)
    }

    /// Returns every violation that can be determined, in check order.
    ///
    /// Empty cache groups are always reported as one aggregated error. Other
    /// violations are reported one per offending node or edge.
    pub fn violations(&self, topology: &FlatTopology) -> Vec<TopologyError> {
        let (graph, mut faults) = self.graph_builder().collect(topology);
        if let Some(graph) = graph {
            faults.extend(self.topology_faults(topology, &graph));
        }
        faults
    }

    fn topology_faults(&self, topology: &FlatTopology, graph: &TopologyGraph) -> Vec<TopologyError> {
        let mut faults = Vec::new();
        if self.config.validate_name && !is_valid_name(&topology.name) {
            faults.push(TopologyError::InvalidName {
                name: topology.name.clone(),
            });
        }
        if self.config.forbid_leaf_mids {
            faults.extend(leaf_mids(graph));
        }
        faults
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Mid-tier members must serve at least one child, primary or secondary.
pub fn leaf_mids(graph: &TopologyGraph) -> Vec<TopologyError> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| node.tier() == Tier::Mid)
        .filter(|&(index, _)| {
            graph.primary_children(index).is_empty() && graph.secondary_children(index).next().is_none()
        })
        .map(|(_, node)| TopologyError::LeafMid {
            cache_group: node.name().to_string(),
        })
        .collect()
}
