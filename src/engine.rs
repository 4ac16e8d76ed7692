use crate::config::EngineConfig;
use crate::convert::{flatten, project};
use crate::directory::{CacheGroupDirectory, ServerInventory};
use crate::error::TopologyError;
use crate::graph::TopologyGraph;
use crate::topology::{FlatTopology, Forest, TreeNode, forest_size};
use crate::validator::Validator;
use tracing::{debug, info};

/// The entry point for converting topologies between their flat and nested
/// forms.
///
/// An engine borrows read-only snapshots of the cache group directory and the
/// server inventory. It holds no mutable state, so one engine can serve any
/// number of conversions, from any number of threads.
pub struct TopologyEngine<'a> {
    directory: &'a dyn CacheGroupDirectory,
    inventory: &'a dyn ServerInventory,
    config: EngineConfig,
}

/// Configures a [`TopologyEngine`].
///
/// Starts from [`EngineConfig::default`]; each setter overrides one rule switch.
pub struct TopologyEngineBuilder<'a> {
    directory: &'a dyn CacheGroupDirectory,
    inventory: &'a dyn ServerInventory,
    config: EngineConfig,
}

impl<'a> TopologyEngineBuilder<'a> {
    pub fn new(directory: &'a dyn CacheGroupDirectory, inventory: &'a dyn ServerInventory) -> Self {
        Self {
            directory,
            inventory,
            config: EngineConfig::default(),
        }
    }

    /// Replaces every rule switch at once.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether every member cache group must have at least one server.
    pub fn require_servers(mut self, require: bool) -> Self {
        self.config.require_servers = require;
        self
    }

    /// Whether a Mid-tier cache group without children is rejected.
    pub fn forbid_leaf_mids(mut self, forbid: bool) -> Self {
        self.config.forbid_leaf_mids = forbid;
        self
    }

    /// Whether the topology name is checked for allowed characters.
    pub fn validate_name(mut self, validate: bool) -> Self {
        self.config.validate_name = validate;
        self
    }

    pub fn build(self) -> TopologyEngine<'a> {
        TopologyEngine {
            directory: self.directory,
            inventory: self.inventory,
            config: self.config,
        }
    }
}

impl<'a> TopologyEngine<'a> {
    pub fn builder(
        directory: &'a dyn CacheGroupDirectory,
        inventory: &'a dyn ServerInventory,
    ) -> TopologyEngineBuilder<'a> {
        TopologyEngineBuilder::new(directory, inventory)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(self.directory, self.inventory, &self.config)
    }

    /// Validates a flat topology and returns its graph.
    pub fn validate(&self, topology: &FlatTopology) -> Result<TopologyGraph, TopologyError> {
        self.validator().validate(topology)
    }

    /// Every violation in the topology; empty when it is valid.
    pub fn violations(&self, topology: &FlatTopology) -> Vec<TopologyError> {
        self.validator().violations(topology)
    }

    /// Converts a stored topology into the nested form used for editing.
    pub fn topology_to_tree(&self, topology: &FlatTopology) -> Result<Forest, TopologyError> {
        let graph = self.validate(topology)?;
        let forest = project(&graph);
        info!(
            topology = %topology.name,
            nodes = graph.len(),
            roots = forest.len(),
            "projected topology to tree"
        );
        Ok(forest)
    }

    /// Converts an edited forest back into the stored form.
    ///
    /// The flattened result is validated exactly like a stored topology, so
    /// edits that break tier ordering, introduce cycles or reference unknown
    /// cache groups are rejected here.
    pub fn tree_to_topology(
        &self,
        name: &str,
        description: &str,
        forest: &[TreeNode],
    ) -> Result<FlatTopology, TopologyError> {
        debug!(topology = %name, nodes = forest_size(forest), "flattening tree");
        let topology = flatten(name, description, forest)?;
        self.validate(&topology)?;
        info!(topology = %name, nodes = topology.nodes.len(), "flattened tree to topology");
        Ok(topology)
    }
}
