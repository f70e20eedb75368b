//! Save/load snapshots for pursuit schedules
//!
//! The host owns the actual on-disk encoding; this module only defines the
//! set of fields that must round-trip losslessly and the two explicit
//! migration steps around them: a stale-map sweep on both save and load, and
//! post-load faction re-resolution keyed by the recorded display label (the
//! faction entity itself may not exist yet at deserialization time).

use std::collections::HashSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::PursuitConfig;
use crate::core::types::{FactionDefId, FactionId, MapId, Tick};
use crate::host::{FactionRegistry, MapDirectory};
use crate::schedule::pursuit::{PursuitSchedule, PursuitState};
use crate::schedule::windows::TimeBase;

/// Everything a schedule persists
///
/// The suspended state is saved as a cache only; it is recomputed from
/// faction state on the first tick after load. Timer windows are derived,
/// so only the configuration they come from is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub config: PursuitConfig,
    pub target_def: FactionDefId,
    pub target_label: String,
    pub first_cycle: bool,
    pub state: PursuitState,
    pub warning_deadlines: AHashMap<MapId, Tick>,
    pub raid_deadlines: AHashMap<MapId, Tick>,
}

impl PursuitSchedule {
    /// Capture a snapshot, dropping entries whose map is already gone
    pub fn snapshot(&self, maps: &dyn MapDirectory) -> ScheduleSnapshot {
        let live = |map: &MapId| maps.info(*map).is_some();
        ScheduleSnapshot {
            config: self.config.clone(),
            target_def: self.target_def.clone(),
            target_label: self.target_label.clone(),
            first_cycle: self.first_cycle,
            state: self.state,
            warning_deadlines: self
                .warning_deadlines
                .iter()
                .filter(|(map, _)| live(map))
                .map(|(&map, &t)| (map, t))
                .collect(),
            raid_deadlines: self
                .raid_deadlines
                .iter()
                .filter(|(map, _)| live(map))
                .map(|(&map, &t)| (map, t))
                .collect(),
        }
    }

    /// Rebuild a schedule from a snapshot
    ///
    /// Sweeps deadline entries for maps that no longer exist and re-resolves
    /// the target faction, preferring the recorded label so that one of
    /// several same-definition factions is matched back deterministically.
    /// Failure to resolve is not an error; the schedule comes back inert.
    pub fn restore(
        snapshot: ScheduleSnapshot,
        time: TimeBase,
        seed: u64,
        maps: &dyn MapDirectory,
        factions: &dyn FactionRegistry,
        claimed: &mut HashSet<FactionId>,
    ) -> Self {
        let mut schedule = Self::new(
            snapshot.config,
            snapshot.target_def,
            snapshot.target_label,
            time,
            seed,
        );
        schedule.first_cycle = snapshot.first_cycle;
        schedule.state = snapshot.state;
        let stale: Vec<MapId> = snapshot
            .warning_deadlines
            .keys()
            .chain(snapshot.raid_deadlines.keys())
            .filter(|map| maps.info(**map).is_none())
            .copied()
            .collect();
        schedule.warning_deadlines = snapshot.warning_deadlines;
        schedule.raid_deadlines = snapshot.raid_deadlines;
        for map in stale {
            tracing::debug!("Dropping stale pursuit timers for destroyed map {:?}", map);
            schedule.warning_deadlines.remove(&map);
            schedule.raid_deadlines.remove(&map);
        }
        schedule.resolve_target(factions, claimed);
        schedule.log_state();
        schedule
    }
}
