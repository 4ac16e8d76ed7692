//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! cdn-topology crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use cdn_topology::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot = DirectorySnapshot::from_file("path/to/cachegroups.json", &TierMapping::default())?;
//! let topology = FlatTopology::from_file("path/to/topology.json")?;
//!
//! let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
//! let forest = engine.topology_to_tree(&topology)?;
//! println!("{} root(s)", forest.len());
//! # Ok(())
//! # }
//! ```

// Engine and configuration
pub use crate::config::EngineConfig;
pub use crate::engine::{TopologyEngine, TopologyEngineBuilder};

// Collaborators
pub use crate::directory::{
    CacheGroupDirectory, CacheGroupRef, DirectorySnapshot, ServerInventory, Tier, TierMapping,
};

// Data shapes
pub use crate::graph::{EdgeKind, TopologyGraph, TopologyWarning};
pub use crate::topology::{FlatTopology, FlatTopologyNode, Forest, TreeNode};

// Error types
pub use crate::error::{ErrorClass, IndexFault, SnapshotError, TopologyError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
