use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod snapshot;

pub use snapshot::*;

/// The role of a cache group in the content-routing hierarchy.
///
/// The derived ordering is the parentage order: a child may only fetch from a
/// parent whose tier is greater than or equal to its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Edge,
    Mid,
    Origin,
    Other,
}

impl Tier {
    /// Returns `true` if a cache group of this tier may use `parent` as a parent.
    pub fn may_parent_to(self, parent: Tier) -> bool {
        self <= parent
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Edge => "EDGE",
            Tier::Mid => "MID",
            Tier::Origin => "ORIGIN",
            Tier::Other => "OTHER",
        };
        f.write_str(label)
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EDGE" => Ok(Tier::Edge),
            "MID" => Ok(Tier::Mid),
            "ORIGIN" | "ORG" => Ok(Tier::Origin),
            "OTHER" => Ok(Tier::Other),
            other => Err(format!("unknown tier '{}'", other)),
        }
    }
}

/// A resolved cache group: its identity and tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheGroupRef {
    pub name: String,
    pub tier: Tier,
}

impl CacheGroupRef {
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }
}

/// Read-only lookup of cache groups by name.
pub trait CacheGroupDirectory: Send + Sync {
    fn lookup(&self, name: &str) -> Option<CacheGroupRef>;
}

/// Read-only count of servers assigned to each cache group.
pub trait ServerInventory: Send + Sync {
    fn servers_in_cache_group(&self, name: &str) -> usize;

    fn has_servers(&self, name: &str) -> bool {
        self.servers_in_cache_group(name) > 0
    }
}

impl CacheGroupDirectory for AHashMap<String, CacheGroupRef> {
    fn lookup(&self, name: &str) -> Option<CacheGroupRef> {
        self.get(name).cloned()
    }
}

impl ServerInventory for AHashMap<String, usize> {
    fn servers_in_cache_group(&self, name: &str) -> usize {
        self.get(name).copied().unwrap_or(0)
    }
}

/// Maps Traffic Ops cache group type names (e.g. `EDGE_LOC`) onto tiers.
///
/// Exact mappings registered through [`TierMapping::with_type_mapping`] win;
/// otherwise the type name's prefix decides, and anything unrecognised is
/// [`Tier::Other`].
#[derive(Debug, Clone, Default)]
pub struct TierMapping {
    exact: AHashMap<String, Tier>,
}

impl TierMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_mapping(mut self, type_name: &str, tier: Tier) -> Self {
        self.exact.insert(type_name.to_ascii_uppercase(), tier);
        self
    }

    pub fn tier_for(&self, type_name: &str) -> Tier {
        let upper = type_name.to_ascii_uppercase();
        if let Some(tier) = self.exact.get(&upper) {
            return *tier;
        }
        if upper.starts_with("EDGE") {
            Tier::Edge
        } else if upper.starts_with("MID") {
            Tier::Mid
        } else if upper.starts_with("ORG") {
            Tier::Origin
        } else {
            Tier::Other
        }
    }
}
