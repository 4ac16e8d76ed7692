use super::{CacheGroupDirectory, CacheGroupRef, ServerInventory, Tier, TierMapping};
use crate::error::SnapshotError;
use ahash::AHashMap;
use serde::Deserialize;
use std::fs;

/// A cache group entry as it appears in a snapshot file.
///
/// Either `type` (a Traffic Ops type name such as `MID_LOC`) or `tier` must be given.
#[derive(Debug, Deserialize)]
pub struct RawCacheGroup {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub servers: usize,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(alias = "cachegroups", alias = "cache_groups")]
    #[serde(rename = "cacheGroups")]
    cache_groups: Vec<RawCacheGroup>,
}

#[derive(Debug, Clone)]
struct SnapshotEntry {
    tier: Tier,
    servers: usize,
}

/// A consistent, in-memory snapshot of both the cache group directory and the
/// server inventory.
///
/// Callers should take one snapshot per conversion so that tier lookups and
/// server counts cannot race each other.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: AHashMap<String, SnapshotEntry>,
}

impl DirectorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a cache group. Returns `self` for chaining.
    pub fn with_cache_group(mut self, name: &str, tier: Tier, servers: usize) -> Self {
        self.insert(name, tier, servers);
        self
    }

    pub fn insert(&mut self, name: &str, tier: Tier, servers: usize) {
        self.entries
            .insert(name.to_string(), SnapshotEntry { tier, servers });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a snapshot from raw entries, resolving type names through `mapping`.
    pub fn from_raw(
        raw: Vec<RawCacheGroup>,
        mapping: &TierMapping,
    ) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::new();
        for group in raw {
            let tier = match (group.tier, group.type_name.as_deref()) {
                (Some(tier), _) => tier,
                (None, Some(type_name)) => mapping.tier_for(type_name),
                (None, None) => {
                    return Err(SnapshotError::Parse(format!(
                        "cachegroup '{}' has neither a type nor a tier",
                        group.name
                    )));
                }
            };
            snapshot.insert(&group.name, tier, group.servers);
        }
        Ok(snapshot)
    }

    /// Parses a snapshot document of the form `{"cacheGroups": [...]}`.
    pub fn from_json(json: &str, mapping: &TierMapping) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::Parse(e.to_string()))?;
        Self::from_raw(raw.cache_groups, mapping)
    }

    /// Loads a snapshot document from a JSON file.
    pub fn from_file(path: &str, mapping: &TierMapping) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content, mapping)
    }
}

impl CacheGroupDirectory for DirectorySnapshot {
    fn lookup(&self, name: &str) -> Option<CacheGroupRef> {
        self.entries
            .get(name)
            .map(|entry| CacheGroupRef::new(name, entry.tier))
    }
}

impl ServerInventory for DirectorySnapshot {
    fn servers_in_cache_group(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |entry| entry.servers)
    }
}
