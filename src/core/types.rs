//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for a live map instance
///
/// Maps can be destroyed independently of the schedules tracking them, so
/// per-map tables are keyed by this stable identifier rather than by any
/// live map handle. Entries for destroyed maps are swept at save/load and
/// opportunistically while ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub Uuid);

impl MapId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MapId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a live faction entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub Uuid);

impl FactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FactionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a faction definition (the template factions are spawned from)
///
/// Several live factions may share one definition. A schedule configured
/// against a definition re-resolves its concrete faction after load using the
/// display label it recorded at assignment time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionDefId(pub String);

impl FactionDefId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for FactionDefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_id_equality() {
        let a = MapId::new();
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, MapId::new());
    }

    #[test]
    fn test_faction_def_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<FactionDefId, &str> = HashMap::new();
        map.insert(FactionDefId::new("Mechanoid"), "machines");
        assert_eq!(map.get(&FactionDefId::new("Mechanoid")), Some(&"machines"));
    }
}
