//! Tests for whole-topology validation and the engine's validation entry points.
mod common;
use cdn_topology::prelude::*;
use cdn_topology::validator::Validator;
use common::*;
use tracing_test::traced_test;

#[test]
fn test_revalidation_is_idempotent() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let topology = create_two_tree_topology();

    assert!(engine.validate(&topology).is_ok());
    assert!(engine.validate(&topology).is_ok());
    assert!(engine.violations(&topology).is_empty());
    assert!(engine.violations(&topology).is_empty());
}

#[test]
fn test_rejects_zero_nodes() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let empty = FlatTopology::default();

    assert_eq!(
        engine.topology_to_tree(&empty).unwrap_err(),
        TopologyError::EmptyTopology { found: 0 }
    );
    assert_eq!(
        engine.violations(&empty),
        vec![TopologyError::EmptyTopology { found: 0 }]
    );
}

#[test]
fn test_rejects_leaf_mid() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let leaf = topology(vec![node("origin", &[]), node("mid", &[0])]);

    assert_eq!(
        engine.validate(&leaf).unwrap_err(),
        TopologyError::LeafMid {
            cache_group: "mid".to_string()
        }
    );
    assert!(engine
        .validate(&leaf)
        .unwrap_err()
        .to_string()
        .contains("it cannot be a leaf"));

    let lenient = TopologyEngine::builder(&snapshot, &snapshot)
        .forbid_leaf_mids(false)
        .build();
    assert!(lenient.validate(&leaf).is_ok());
}

#[test]
fn test_mid_with_only_secondary_children_is_not_a_leaf() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let shape = topology(vec![
        node("origin", &[]),
        node("mid", &[0]),
        node("mid-2", &[0]),
        node("edge", &[1, 2]),
    ]);

    assert!(engine.validate(&shape).is_ok());
}

#[test]
fn test_accepts_second_origin_used_only_as_fallback() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let multi_origin = topology(vec![
        node("origin", &[]),
        node("origin-2", &[]),
        node("mid", &[0, 1]),
        node("edge", &[2]),
    ]);

    let graph = engine.validate(&multi_origin).expect("Fallback origins are legal");
    assert_eq!(graph.roots().collect::<Vec<_>>(), vec![0, 1]);
    assert!(engine.violations(&multi_origin).is_empty());

    let forest = engine.topology_to_tree(&multi_origin).expect("Failed to project");
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[1], TreeNode::new("origin-2"));

    let flat = engine
        .tree_to_topology(&multi_origin.name, &multi_origin.description, &forest)
        .expect("Failed to flatten");
    assert!(engine.validate(&flat).unwrap().is_equivalent(&graph));
}

#[test]
fn test_name_validation_is_opt_in() {
    let snapshot = create_snapshot();
    let bad_name = FlatTopology::new("no spaces allowed", "", vec![node("origin", &[])]);

    let default_engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    assert!(default_engine.validate(&bad_name).is_ok());

    let strict = TopologyEngine::builder(&snapshot, &snapshot)
        .validate_name(true)
        .build();
    assert_eq!(
        strict.validate(&bad_name).unwrap_err(),
        TopologyError::InvalidName {
            name: "no spaces allowed".to_string()
        }
    );

    let good_name = FlatTopology::new("mso_topology-1", "", vec![node("origin", &[])]);
    assert!(strict.validate(&good_name).is_ok());
}

#[test]
fn test_violations_collects_independent_failures() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let broken = topology(vec![
        node("empty-origin", &[]),
        node("mid", &[0]),
        node("edge", &[1]),
        node("mid-2", &[2]),
        node("empty-edge", &[0]),
    ]);

    let violations = engine.violations(&broken);
    assert_eq!(
        violations,
        vec![
            TopologyError::InvalidTierOrdering {
                child: "mid-2".to_string(),
                child_tier: Tier::Mid,
                parent: "edge".to_string(),
                parent_tier: Tier::Edge,
                kind: EdgeKind::Primary,
            },
            TopologyError::EmptyCacheGroup {
                names: vec!["empty-origin".to_string(), "empty-edge".to_string()]
            },
            TopologyError::LeafMid {
                cache_group: "mid-2".to_string()
            },
        ]
    );

    // The fail-fast path reports only the first of them.
    assert_eq!(engine.validate(&broken).unwrap_err(), violations[0]);
}

#[test]
fn test_violations_stop_at_structural_faults() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let broken = topology(vec![
        node("origin", &[4]),
        node("edge", &[1]),
        node("edge", &[0]),
    ]);

    let violations = engine.violations(&broken);
    assert_eq!(violations.len(), 3);
    assert!(matches!(
        violations[0],
        TopologyError::MalformedIndex {
            fault: IndexFault::OutOfRange { len: 3 },
            ..
        }
    ));
    assert!(matches!(
        violations[1],
        TopologyError::MalformedIndex {
            fault: IndexFault::SelfParent,
            ..
        }
    ));
    assert!(matches!(
        violations[2],
        TopologyError::DuplicateCacheGroup { .. }
    ));
}

#[test]
fn test_validator_honours_config() {
    let snapshot = create_snapshot();
    let config = EngineConfig {
        require_servers: false,
        ..Default::default()
    };
    let validator = Validator::new(&snapshot, &snapshot, &config);

    assert!(validator
        .validate(&topology(vec![node("empty-origin", &[])]))
        .is_ok());
}

#[test]
#[traced_test]
fn test_edge_parenting_edge_is_a_warning() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();
    let chained = topology(vec![
        node("origin", &[]),
        node("edge", &[0]),
        node("edge-2", &[1]),
    ]);

    let graph = engine.validate(&chained).expect("Edge parents are legal");
    assert_eq!(
        graph.warnings(),
        &[TopologyWarning::EdgeParent {
            child: "edge-2".to_string(),
            parent: "edge".to_string(),
            kind: EdgeKind::Primary,
        }]
    );
    assert!(logs_contain(
        "cachegroup 'edge-2' uses EDGE cachegroup 'edge' as its primary parent"
    ));
}

#[test]
#[traced_test]
fn test_conversion_is_logged() {
    let snapshot = create_snapshot();
    let engine = TopologyEngine::builder(&snapshot, &snapshot).build();

    engine
        .topology_to_tree(&create_three_tier_topology())
        .unwrap();
    assert!(logs_contain("projected topology to tree"));
}
