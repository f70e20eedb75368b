//! Schedule aggregator
//!
//! Pure fan-out over N independent pursuit schedules, one per eligible
//! faction discovered at world generation. Exists so "every faction pursues
//! the player" is a single configuration choice; it adds no scheduling logic
//! of its own beyond delegation, a shared claimed-faction set, and a slower
//! alert-refresh cadence that bounds rendering cost.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::config::PursuitConfig;
use crate::core::error::{PursuitError, Result};
use crate::core::types::{FactionId, MapId, Tick};
use crate::host::{FactionRegistry, HostServices, MapDirectory};
use crate::schedule::persist::ScheduleSnapshot;
use crate::schedule::pursuit::PursuitSchedule;
use crate::schedule::windows::TimeBase;
use crate::schedule::ThreatAlert;

/// Knobs for the aggregator's alert collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Minimum ticks between alert-cache rebuilds. Rendering polls alerts far
    /// more often than they change, so the cache refreshes on its own
    /// cadence, independent of the hourly schedule cadence.
    pub alert_refresh_ticks: Tick,
    /// Upper bound on alerts returned at once
    pub max_alerts: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            alert_refresh_ticks: 250,
            max_alerts: 16,
        }
    }
}

/// Persisted form of the aggregator: just its schedules, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorSnapshot {
    pub schedules: Vec<ScheduleSnapshot>,
}

/// Manages one pursuit schedule per eligible faction
pub struct ScheduleAggregator {
    /// Configuration template applied to every generated schedule
    template: PursuitConfig,
    config: AggregatorConfig,
    time: TimeBase,
    schedules: Vec<PursuitSchedule>,
    alert_cache: Vec<ThreatAlert>,
    last_alert_refresh: Option<Tick>,
}

impl ScheduleAggregator {
    pub fn new(template: PursuitConfig, config: AggregatorConfig, time: TimeBase) -> Self {
        Self {
            template,
            config,
            time,
            schedules: Vec::new(),
            alert_cache: Vec::new(),
            last_alert_refresh: None,
        }
    }

    pub fn schedules(&self) -> &[PursuitSchedule] {
        &self.schedules
    }

    /// Instantiate one schedule per eligible faction
    ///
    /// Eligibility: selectable in faction configuration, not the player's
    /// own faction, capable of staging attacks. Insertion order follows the
    /// registry's discovery order. Each concrete faction is claimed exactly
    /// once even when several share a definition.
    pub fn generate(&mut self, now: Tick, host: &mut HostServices, seed: u64) {
        self.schedules.clear();
        self.alert_cache.clear();
        self.last_alert_refresh = None;
        let mut claimed: HashSet<FactionId> = HashSet::new();
        for faction in host.factions.factions() {
            let Some(profile) = host.factions.profile(faction) else {
                continue;
            };
            if !profile.selectable || profile.is_player || !profile.can_stage_attacks {
                continue;
            }
            if claimed.contains(&faction) {
                continue;
            }
            let mut schedule = PursuitSchedule::new(
                self.template.clone(),
                profile.def.clone(),
                profile.label.clone(),
                self.time,
                seed.wrapping_add(self.schedules.len() as u64),
            );
            schedule.activate(now, host, &mut claimed);
            self.schedules.push(schedule);
        }
        tracing::debug!("Generated {} pursuit schedules", self.schedules.len());
    }

    /// Configuration-time mutual exclusion: refuse a standalone schedule that
    /// targets a faction one of ours already pursues
    pub fn check_coexistence(&self, other: &PursuitSchedule) -> Result<()> {
        if self.schedules.iter().any(|s| s.conflicts_with(other)) {
            return Err(PursuitError::FactionAlreadyClaimed(other.target_def().clone()));
        }
        Ok(())
    }

    /// Whether any schedule here pursues a faction that a schedule of the
    /// other aggregator also pursues. Two aggregator instances must not both
    /// be active when this returns true.
    pub fn conflicts_with(&self, other: &ScheduleAggregator) -> bool {
        self.schedules
            .iter()
            .any(|s| other.schedules.iter().any(|o| s.conflicts_with(o)))
    }

    /// Whether the host may use this faction as a source for ordinary,
    /// unrelated raid generation
    pub fn faction_can_be_ordinary_raid_source(&self, faction: FactionId) -> bool {
        self.schedules
            .iter()
            .filter(|s| s.target_faction() == Some(faction))
            .all(|s| s.allows_ordinary_raids())
    }

    pub fn map_added(&mut self, map: MapId, now: Tick, maps: &dyn MapDirectory) {
        for schedule in &mut self.schedules {
            schedule.map_added(map, now, maps);
        }
    }

    pub fn map_removed(&mut self, map: MapId) {
        for schedule in &mut self.schedules {
            schedule.map_removed(map);
        }
    }

    pub fn tick(&mut self, now: Tick, host: &mut HostServices) {
        for schedule in &mut self.schedules {
            schedule.tick(now, host);
        }
    }

    /// Current alerts across all schedules, bounded and cached
    pub fn alerts(&mut self, now: Tick, maps: &dyn MapDirectory) -> &[ThreatAlert] {
        let due = match self.last_alert_refresh {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.config.alert_refresh_ticks,
        };
        if due {
            self.alert_cache.clear();
            for schedule in &mut self.schedules {
                if self.alert_cache.len() >= self.config.max_alerts {
                    break;
                }
                if let Some(alert) = schedule.current_alert(now, maps) {
                    self.alert_cache.push(alert.clone());
                }
            }
            self.last_alert_refresh = Some(now);
        }
        &self.alert_cache
    }

    pub fn snapshot(&self, maps: &dyn MapDirectory) -> AggregatorSnapshot {
        AggregatorSnapshot {
            schedules: self.schedules.iter().map(|s| s.snapshot(maps)).collect(),
        }
    }

    /// Rebuild the aggregator from a snapshot, re-resolving every schedule's
    /// faction against one shared claimed set so no two schedules come back
    /// holding the same concrete faction
    pub fn restore(
        snapshot: AggregatorSnapshot,
        template: PursuitConfig,
        config: AggregatorConfig,
        time: TimeBase,
        seed: u64,
        maps: &dyn MapDirectory,
        factions: &dyn FactionRegistry,
    ) -> Self {
        let mut claimed: HashSet<FactionId> = HashSet::new();
        let schedules = snapshot
            .schedules
            .into_iter()
            .enumerate()
            .map(|(i, snap)| {
                PursuitSchedule::restore(
                    snap,
                    time,
                    seed.wrapping_add(i as u64),
                    maps,
                    factions,
                    &mut claimed,
                )
            })
            .collect();
        Self {
            template,
            config,
            time,
            schedules,
            alert_cache: Vec::new(),
            last_alert_refresh: None,
        }
    }
}
