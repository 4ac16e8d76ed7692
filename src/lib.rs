//! # cdn-topology - Topology Conversion and Validation Engine
//!
//! A CDN **topology** is a named, reusable directed structure over cache groups
//! that decides where each cache fetches content from on a miss. Topologies
//! travel in two shapes:
//!
//! - **Flat** ([`topology::FlatTopology`]): the storage/REST shape. A list of
//!   nodes, each naming a cache group and pointing at its primary (and
//!   optionally secondary) parent by position in the list.
//! - **Nested** ([`topology::Forest`]): the editing shape. Trees that follow
//!   the primary-parent hierarchy, with the secondary parent kept as a by-name
//!   reference on each node.
//!
//! ## Core Workflow
//!
//! 1.  **Take a snapshot**: Provide a [`directory::CacheGroupDirectory`] (names and tiers)
//!     and a [`directory::ServerInventory`] (server counts). [`directory::DirectorySnapshot`]
//!     implements both and can be loaded from JSON.
//! 2.  **Build an engine**: `TopologyEngine::builder(&snapshot, &snapshot).build()`.
//! 3.  **Load for editing**: `engine.topology_to_tree(&flat)` validates and projects.
//! 4.  **Save edits**: `engine.tree_to_topology(name, description, &forest)` flattens
//!     and re-validates before anything is handed back to storage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdn_topology::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let snapshot = DirectorySnapshot::new()
//!         .with_cache_group("origin", Tier::Origin, 1)
//!         .with_cache_group("mid", Tier::Mid, 2)
//!         .with_cache_group("edge", Tier::Edge, 4);
//!
//!     let flat = FlatTopology::from_json(
//!         r#"{
//!             "name": "demo",
//!             "description": "three tiers",
//!             "nodes": [
//!                 {"cachegroup": "edge", "parents": [1, 2]},
//!                 {"cachegroup": "mid", "parents": [2]},
//!                 {"cachegroup": "origin", "parents": []}
//!             ]
//!         }"#,
//!     )?;
//!
//!     let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
//!     let forest = engine.topology_to_tree(&flat)?;
//!     println!("{}", serde_json::to_string_pretty(&forest)?);
//!
//!     let saved = engine.tree_to_topology(&flat.name, &flat.description, &forest)?;
//!     assert!(engine.validate(&saved)?.is_equivalent(&engine.validate(&flat)?));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod directory;
pub mod engine;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod topology;
pub mod validator;
