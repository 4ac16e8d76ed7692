use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::fs;

/// A single entry in the flat, index-addressed topology representation.
///
/// `parent_indices[0]` is the primary parent and `parent_indices[1]`, if
/// present, the secondary parent. Both index into the owning node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTopologyNode {
    #[serde(rename = "cachegroup")]
    pub cache_group_name: String,
    #[serde(rename = "parents", default)]
    pub parent_indices: Vec<usize>,
}

impl FlatTopologyNode {
    pub fn new(cache_group_name: impl Into<String>, parent_indices: Vec<usize>) -> Self {
        Self {
            cache_group_name: cache_group_name.into(),
            parent_indices,
        }
    }

    pub fn primary_parent(&self) -> Option<usize> {
        self.parent_indices.first().copied()
    }

    pub fn secondary_parent(&self) -> Option<usize> {
        self.parent_indices.get(1).copied()
    }

    pub fn is_root(&self) -> bool {
        self.parent_indices.is_empty()
    }
}

/// The storage/REST representation of a topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTopology {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<FlatTopologyNode>,
}

impl FlatTopology {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        nodes: Vec<FlatTopologyNode>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            nodes,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Parse(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Parse(e.to_string()))
    }

    pub fn cache_group_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.cache_group_name.as_str())
    }
}
