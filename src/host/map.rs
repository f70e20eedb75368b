//! Map directory interface

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionDefId, MapId};

/// Broad classification of a map, as far as scheduling cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    /// An ordinary ground map
    Surface,
    /// A transient pocket map (caves, vaults); never scheduled against
    Pocket,
    /// An orbital platform
    Orbital,
    /// A pocket map in space
    SpacePocket,
}

impl MapKind {
    pub fn is_pocket(&self) -> bool {
        matches!(self, Self::Pocket | Self::SpacePocket)
    }

    /// Whether raiders can physically walk in from the map edge
    pub fn edge_walkable(&self) -> bool {
        matches!(self, Self::Surface)
    }
}

/// A read-only view of one live map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub id: MapId,
    pub kind: MapKind,
    /// Whether this map is a player home; alerts only render for homes
    pub player_home: bool,
    /// Set when the map is a faction's own staging ground (e.g. the machine
    /// hive); that faction will not raid it
    pub staging_ground_of: Option<FactionDefId>,
}

/// Map lookup service, supplied by the host
pub trait MapDirectory {
    /// All currently live maps
    fn live_maps(&self) -> Vec<MapId>;

    /// Info for one map, `None` once the map has been destroyed
    fn info(&self, map: MapId) -> Option<MapInfo>;

    /// The map the player is currently viewing, if any
    fn current_map(&self) -> Option<MapId>;
}
