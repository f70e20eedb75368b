//! Raid-incident executor interface

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, MapId};

/// How raiders enter a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalMode {
    /// Drop pods scattered across the map
    DropIn,
    /// Walk in from the map edge
    EdgeWalk,
    /// Drop pods near the map edge
    EdgeDrop,
    /// Drop pods at the map center
    CenterDrop,
}

impl ArrivalMode {
    /// Airborne modes need flight-capable technology
    pub fn requires_flight(&self) -> bool {
        !matches!(self, Self::EdgeWalk)
    }

    /// Downgrade to ground entry when the faction cannot fly
    pub fn downgraded(self, has_flight: bool) -> Self {
        if self.requires_flight() && !has_flight {
            Self::EdgeWalk
        } else {
            self
        }
    }
}

/// Assault strategy handed to the incident executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidStrategy {
    /// Attack as soon as the raiders arrive; pursuit always uses this
    ImmediateAttack,
    /// Gather at the edge before attacking
    StageThenAttack,
}

/// A fully specified raid, ready for the host to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidRequest {
    pub map: MapId,
    pub faction: FactionId,
    pub arrival: ArrivalMode,
    pub strategy: RaidStrategy,
    /// Threat point budget for the spawned raid
    pub points: f32,
    /// Bypass the host's normal incident eligibility checks
    pub forced: bool,
}

/// Raid-incident executor, supplied by the host
pub trait RaidExecutor {
    /// Spawn the raid. Returns false if the host could not execute it;
    /// the schedule logs that and moves on.
    fn execute(&mut self, raid: RaidRequest) -> bool;
}

/// Storyteller-style threat point baseline, supplied by the host
pub trait ThreatBaseline {
    /// Default threat points for a raid against this map right now
    fn default_threat_points(&self, map: MapId) -> f32;
}
