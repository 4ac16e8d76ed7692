use crate::graph::EdgeKind;
use crate::directory::Tier;
use itertools::Itertools;
use thiserror::Error;

/// Why a parent index could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexFault {
    #[error("out of range for a topology of {len} nodes")]
    OutOfRange { len: usize },

    #[error("a node cannot be its own parent")]
    SelfParent,
}

/// Broad classes of [`TopologyError`], separating bad user input from corrupt stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input violates a topology rule and can be fixed and resubmitted.
    Validation,
    /// The stored representation is internally inconsistent. A correctly driven
    /// editor never produces this.
    DataCorruption,
}

/// Errors that can occur while building, converting or validating a topology.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("'length' must provide 1 or more node, {found} found")]
    EmptyTopology { found: usize },

    #[error("node {node} has malformed parent index {index}: {fault}")]
    MalformedIndex {
        node: usize,
        index: usize,
        fault: IndexFault,
    },

    #[error("node {node} ('{cache_group}') has {count} parents; at most 2 are allowed")]
    TooManyParents {
        node: usize,
        cache_group: String,
        count: usize,
    },

    #[error("cachegroup '{cache_group}' lists '{parent}' as both its primary and secondary parent")]
    DuplicateParents { cache_group: String, parent: String },

    #[error("cachegroup '{name}' appears more than once in the topology")]
    DuplicateCacheGroup { name: String },

    #[error("cachegroup '{name}' does not exist")]
    UnknownCacheGroup { name: String },

    #[error("topology contains a cycle: {}", format_cycle(.cycle))]
    CyclicTopology { cycle: Vec<String> },

    #[error(
        "cachegroup '{child}' ({child_tier}) cannot have '{parent}' ({parent_tier}) as its {kind} parent"
    )]
    InvalidTierOrdering {
        child: String,
        child_tier: Tier,
        parent: String,
        parent_tier: Tier,
        kind: EdgeKind,
    },

    #[error("cachegroups with no servers in them: {}", .names.join(", "))]
    EmptyCacheGroup { names: Vec<String> },

    #[error("cachegroup '{cache_group}' has a secondary parent but no primary parent")]
    SecondaryParentOnRoot { cache_group: String },

    #[error("cachegroup '{cache_group}' cannot be its own secondary parent")]
    SelfSecondaryParent { cache_group: String },

    #[error(
        "cachegroup {cache_group}'s type is MID; it cannot be a leaf (it must have at least 1 primary or secondary child cache group)"
    )]
    LeafMid { cache_group: String },

    #[error("topology name '{name}' must consist of only alphanumeric, dash, or underscore characters")]
    InvalidName { name: String },
}

impl TopologyError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TopologyError::MalformedIndex { .. } => ErrorClass::DataCorruption,
            _ => ErrorClass::Validation,
        }
    }
}

/// Renders a cycle as `a -> b -> c -> a`.
fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => cycle.iter().chain(std::iter::once(first)).join(" -> "),
        None => String::new(),
    }
}

/// Errors raised while loading collaborator snapshots or engine configuration.
#[derive(Error, Debug, Clone)]
pub enum SnapshotError {
    #[error("Could not read file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    Parse(String),
}
