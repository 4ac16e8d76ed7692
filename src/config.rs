use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tunable validation rules for a [`crate::engine::TopologyEngine`].
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Reject cache groups that have no servers assigned.
    pub require_servers: bool,
    /// Reject Mid-tier cache groups with neither primary nor secondary children.
    pub forbid_leaf_mids: bool,
    /// Require the topology name to be non-empty and made of alphanumerics, `-` or `_`.
    pub validate_name: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_servers: true,
            forbid_leaf_mids: true,
            validate_name: false,
        }
    }
}

impl EngineConfig {
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
}
