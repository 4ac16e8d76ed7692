//! Integration tests for cdn-topology
//!
//! End-to-end tests that load snapshots and topologies from JSON, edit the
//! tree and save it back the way an editor session would.
//!
mod common;
use cdn_topology::prelude::*;
use serde_json::json;
use std::fs;

fn sample_snapshot_json() -> String {
    json!({
        "cacheGroups": [
            {"name": "origin-east", "type": "ORG_LOC", "servers": 2},
            {"name": "mid-east", "type": "MID_LOC", "servers": 3},
            {"name": "mid-west", "type": "MID_LOC", "servers": 3},
            {"name": "edge-nyc", "type": "EDGE_LOC", "servers": 8},
            {"name": "edge-sfo", "type": "EDGE_LOC", "servers": 6},
            {"name": "edge-new", "type": "EDGE_LOC", "servers": 0}
        ]
    })
    .to_string()
}

fn sample_topology_json() -> String {
    json!({
        "name": "national",
        "description": "two mids behind one origin",
        "nodes": [
            {"cachegroup": "origin-east", "parents": []},
            {"cachegroup": "mid-east", "parents": [0]},
            {"cachegroup": "mid-west", "parents": [0]},
            {"cachegroup": "edge-nyc", "parents": [1, 2]},
            {"cachegroup": "edge-sfo", "parents": [2, 1]}
        ]
    })
    .to_string()
}

#[test]
fn test_load_edit_and_save_session() {
    let snapshot =
        DirectorySnapshot::from_json(&sample_snapshot_json(), &TierMapping::default()).unwrap();
    let stored = FlatTopology::from_json(&sample_topology_json()).unwrap();
    let engine = TopologyEngine::builder(&snapshot, &snapshot)
        .validate_name(true)
        .build();

    let mut forest = engine.topology_to_tree(&stored).expect("Failed to load");
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].children.len(), 2);

    // Move edge-sfo from mid-west to mid-east and swap its secondary to mid-west.
    let mut sfo = forest[0].children[1].children.remove(0);
    assert_eq!(sfo.cache_group_name, "edge-sfo");
    assert_eq!(sfo.secondary_parent_name.as_deref(), Some("mid-east"));
    sfo.secondary_parent_name = Some("mid-west".to_string());
    forest[0].children[0].children.push(sfo);

    // mid-west keeps serving both edges as a secondary parent, so it is not a leaf.
    let saved = engine
        .tree_to_topology(&stored.name, &stored.description, &forest)
        .expect("Failed to save");

    let graph = engine.validate(&saved).unwrap();
    let sfo_index = graph.index_of("edge-sfo").unwrap();
    let sfo_node = graph.node(sfo_index).unwrap();
    assert_eq!(
        graph.node(sfo_node.primary_parent.unwrap()).unwrap().name(),
        "mid-east"
    );
    assert_eq!(
        graph.node(sfo_node.secondary_parent.unwrap()).unwrap().name(),
        "mid-west"
    );
    assert!(!graph.is_equivalent(&engine.validate(&stored).unwrap()));
}

#[test]
fn test_adding_empty_cache_group_is_rejected_on_save() {
    let snapshot =
        DirectorySnapshot::from_json(&sample_snapshot_json(), &TierMapping::default()).unwrap();
    let stored = FlatTopology::from_json(&sample_topology_json()).unwrap();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();

    let mut forest = engine.topology_to_tree(&stored).unwrap();
    forest[0].children[0]
        .children
        .push(TreeNode::new("edge-new"));

    let err = engine
        .tree_to_topology(&stored.name, &stored.description, &forest)
        .unwrap_err();
    assert_eq!(err.to_string(), "cachegroups with no servers in them: edge-new");
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn test_saved_topology_matches_wire_format() {
    let snapshot =
        DirectorySnapshot::from_json(&sample_snapshot_json(), &TierMapping::default()).unwrap();
    let stored = FlatTopology::from_json(&sample_topology_json()).unwrap();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();

    let forest = engine.topology_to_tree(&stored).unwrap();
    let saved = engine
        .tree_to_topology(&stored.name, &stored.description, &forest)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "national",
            "description": "two mids behind one origin",
            "nodes": [
                {"cachegroup": "origin-east", "parents": []},
                {"cachegroup": "mid-east", "parents": [0]},
                {"cachegroup": "edge-nyc", "parents": [1, 3]},
                {"cachegroup": "mid-west", "parents": [0]},
                {"cachegroup": "edge-sfo", "parents": [3, 1]}
            ]
        })
    );
}

#[test]
fn test_files_round_trip_through_disk() {
    let dir = std::env::temp_dir().join(format!("cdn-topology-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let snapshot_path = dir.join("cachegroups.json");
    let topology_path = dir.join("topology.json");
    let config_path = dir.join("engine.json");
    fs::write(&snapshot_path, sample_snapshot_json()).unwrap();
    fs::write(&topology_path, sample_topology_json()).unwrap();
    fs::write(&config_path, r#"{"forbidLeafMids": false}"#).unwrap();

    let snapshot = DirectorySnapshot::from_file(
        snapshot_path.to_str().unwrap(),
        &TierMapping::default(),
    )
    .unwrap();
    let topology = FlatTopology::from_file(topology_path.to_str().unwrap()).unwrap();
    let config = EngineConfig::from_file(config_path.to_str().unwrap()).unwrap();
    assert!(!config.forbid_leaf_mids);

    let engine = TopologyEngine::builder(&snapshot, &snapshot)
        .with_config(config)
        .build();
    assert!(engine.topology_to_tree(&topology).is_ok());

    assert!(matches!(
        FlatTopology::from_file(dir.join("missing.json").to_str().unwrap()),
        Err(SnapshotError::Io { .. })
    ));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let snapshot =
        DirectorySnapshot::from_json(&sample_snapshot_json(), &TierMapping::default()).unwrap();
    let stored = FlatTopology::from_json(&sample_topology_json()).unwrap();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let (engine, stored) = (&engine, &stored);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || engine.topology_to_tree(stored)))
            .collect();
        for handle in handles {
            let forest = handle.join().unwrap().unwrap();
            assert_eq!(forest.len(), 1);
        }
    });
}
