//! Pursuit schedule state machine
//!
//! One `PursuitSchedule` owns all timer state for a single designated hostile
//! faction across every active map: it arms warning and raid deadlines when a
//! map appears, fires the warning, the initial raid, the second wave and then
//! the endless cadence as the hourly clock passes each aligned deadline, and
//! suspends or resumes itself as the faction relationship changes.
//!
//! Suspension is asymmetric on purpose: a faction making peace is reversible,
//! so relations-based suspension retains the per-map timers for a forced
//! minimum-bound restart; a defeated or deactivated faction is terminal, so
//! its timers are dropped and the schedule never re-arms.

use std::collections::HashSet;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PursuitConfig;
use crate::core::types::{FactionDefId, FactionId, MapId, Tick};
use crate::host::map::MapInfo;
use crate::host::raid::{ArrivalMode, RaidRequest, RaidStrategy};
use crate::host::{FactionRegistry, HostServices, MapDirectory, Notification, Severity};
use crate::schedule::alert::ThreatAlert;
use crate::schedule::windows::{TimeBase, TimerWindows};

/// Goodwill corrections run on this hour boundary while the permanent-enemy
/// override is active
const GOODWILL_PULSE_HOURS: Tick = 12;

/// Point multipliers and floors for the three raid tiers
const FIRST_RAID_MULT: f32 = 1.5;
const FIRST_RAID_FLOOR: f32 = 2000.0;
const SECOND_WAVE_MULT: f32 = 2.0;
const SECOND_WAVE_FLOOR: f32 = 8000.0;
const ENDLESS_WAVE_MULT: f32 = 2.0;
const ENDLESS_WAVE_FLOOR: f32 = 10_000.0;

/// Disablement state of one schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitState {
    Active,
    /// Faction is no longer hostile and not a permanent enemy. Reversible;
    /// map timers are retained for a minimum-bound restart.
    SuspendedByRelations,
    /// Faction is gone, deactivated or defeated. Never re-enters Active.
    SuspendedTerminal,
}

impl PursuitState {
    pub fn is_suspended(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Outcome of the hourly disablement re-evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateChange {
    None,
    Suspended,
    Terminated,
    Resumed,
}

/// Timer state for one designated hostile faction across all active maps
pub struct PursuitSchedule {
    pub(crate) config: PursuitConfig,
    pub(crate) time: TimeBase,
    windows: TimerWindows,
    pub(crate) target_def: FactionDefId,
    /// Display name captured at assignment time; doubles as the
    /// disambiguation key when re-resolving after load
    pub(crate) target_label: String,
    pub(crate) target_faction: Option<FactionId>,
    /// Configured mode, possibly downgraded for the faction's technology
    pub(crate) arrival_mode: ArrivalMode,
    pub(crate) warning_deadlines: AHashMap<MapId, Tick>,
    pub(crate) raid_deadlines: AHashMap<MapId, Tick>,
    /// True until the very first timer is armed for any map
    pub(crate) first_cycle: bool,
    pub(crate) state: PursuitState,
    cached_alert: Option<ThreatAlert>,
    alert_map: Option<MapId>,
    rng: ChaCha8Rng,
}

impl PursuitSchedule {
    pub fn new(
        config: PursuitConfig,
        target_def: FactionDefId,
        target_label: impl Into<String>,
        time: TimeBase,
        seed: u64,
    ) -> Self {
        let windows = TimerWindows::derive(&config, time);
        let arrival_mode = config.arrival_mode;
        Self {
            config,
            time,
            windows,
            target_def,
            target_label: target_label.into(),
            target_faction: None,
            arrival_mode,
            warning_deadlines: AHashMap::new(),
            raid_deadlines: AHashMap::new(),
            first_cycle: true,
            state: PursuitState::Active,
            cached_alert: None,
            alert_map: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn target_def(&self) -> &FactionDefId {
        &self.target_def
    }

    pub fn target_faction(&self) -> Option<FactionId> {
        self.target_faction
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn is_first_cycle(&self) -> bool {
        self.first_cycle
    }

    pub fn arrival_mode(&self) -> ArrivalMode {
        self.arrival_mode
    }

    /// Maps currently tracked by this schedule
    pub fn tracked_maps(&self) -> Vec<MapId> {
        self.warning_deadlines.keys().copied().collect()
    }

    /// Whether the host may pick this schedule's faction as a source for
    /// unrelated, ordinary raid generation
    pub fn allows_ordinary_raids(&self) -> bool {
        self.config.allow_ordinary_raids
    }

    /// Two schedules pursuing the same concrete faction (or, while
    /// unresolved, the same definition) must not coexist
    pub fn conflicts_with(&self, other: &PursuitSchedule) -> bool {
        match (self.target_faction, other.target_faction) {
            (Some(a), Some(b)) => a == b,
            _ => self.target_def == other.target_def,
        }
    }

    /// Resolve the configured definition to a concrete faction
    ///
    /// Candidates are every live faction spawned from the definition; one
    /// already claimed by a sibling schedule is never a candidate. Precedence:
    /// an unclaimed label match from a previous assignment, else the first
    /// unclaimed candidate, else unresolved. An unresolved schedule stays
    /// inert; resolution is retried explicitly after load, never implicitly.
    pub fn resolve_target(
        &mut self,
        factions: &dyn FactionRegistry,
        claimed: &mut HashSet<FactionId>,
    ) {
        let candidates = factions.resolve_by_definition(&self.target_def);
        let chosen = candidates
            .iter()
            .find(|id| {
                !claimed.contains(*id)
                    && factions
                        .profile(**id)
                        .is_some_and(|p| p.label == self.target_label)
            })
            .or_else(|| candidates.iter().find(|id| !claimed.contains(*id)))
            .copied();

        match chosen {
            Some(id) => {
                claimed.insert(id);
                if let Some(profile) = factions.profile(id) {
                    self.target_label = profile.label;
                    self.arrival_mode = self.config.arrival_mode.downgraded(profile.has_flight);
                }
                self.target_faction = Some(id);
                tracing::debug!(
                    "Resolved pursuit faction {} for def {}",
                    self.target_label,
                    self.target_def
                );
            }
            None => {
                self.target_faction = None;
                tracing::debug!(
                    "No live faction resolves def {}; pursuit stays inert",
                    self.target_def
                );
            }
        }
    }

    /// Activate the schedule at world generation time
    ///
    /// Clears any per-map state, re-enters the first cycle, resolves the
    /// faction, when configured degrades standing to clearly hostile right
    /// away, and arms timers for every map that already exists.
    pub fn activate(&mut self, now: Tick, host: &mut HostServices, claimed: &mut HashSet<FactionId>) {
        self.first_cycle = true;
        self.state = PursuitState::Active;
        self.warning_deadlines.clear();
        self.raid_deadlines.clear();
        self.cached_alert = None;
        self.alert_map = None;
        self.resolve_target(host.factions, claimed);

        if let Some(faction) = self.target_faction {
            if let Some(profile) = host.factions.profile(faction) {
                if self.config.start_hostile && !profile.permanent_enemy {
                    let deficit = -(100 + profile.goodwill);
                    if deficit != 0 {
                        host.factions.adjust_goodwill(faction, deficit);
                    }
                }
            }
        }
        for map in host.maps.live_maps() {
            if let Some(info) = host.maps.info(map) {
                self.arm_timers(&info, now, false);
            }
        }
        self.log_state();
    }

    /// A map was generated; start its timers if it is eligible
    pub fn map_added(&mut self, map: MapId, now: Tick, maps: &dyn MapDirectory) {
        if self.state == PursuitState::SuspendedTerminal {
            return;
        }
        if let Some(info) = maps.info(map) {
            self.arm_timers(&info, now, false);
        }
    }

    /// A map was destroyed; forget it entirely
    pub fn map_removed(&mut self, map: MapId) {
        if self.warning_deadlines.remove(&map).is_some() {
            self.raid_deadlines.remove(&map);
        }
        if self.alert_map == Some(map) {
            self.cached_alert = None;
            self.alert_map = None;
        }
    }

    /// Arm the warning and raid deadlines for one map
    ///
    /// The first invocation for any map uses the first-raid window; every
    /// later one uses the steady-state windows. `force_minimum` picks the
    /// window's lower bound deterministically, used when resuming after a
    /// relations-based suspension to minimize the player's safety margin.
    ///
    /// Returns false when the map is not eligible: pocket maps, an
    /// unresolved faction, edge-walk arrival onto a map without walkable
    /// edges, or the machine swarm's own staging ground.
    fn arm_timers(&mut self, map: &MapInfo, now: Tick, force_minimum: bool) -> bool {
        if map.kind.is_pocket() {
            return false;
        }
        let Some(faction) = self.target_faction else {
            return false;
        };
        if self.arrival_mode == ArrivalMode::EdgeWalk && !map.kind.edge_walkable() {
            return false;
        }
        if map.staging_ground_of.as_ref() == Some(&self.target_def) {
            return false;
        }

        let first = self.first_cycle;
        let (warning_window, raid_window) = if first {
            (self.windows.first_warning, self.windows.first_raid)
        } else {
            (self.windows.warning, self.windows.raid)
        };
        let (warning_offset, raid_offset) = if force_minimum {
            (warning_window.min, raid_window.min)
        } else {
            (
                warning_window.draw(&mut self.rng),
                raid_window.draw(&mut self.rng),
            )
        };
        let mut warning_deadline = now + warning_offset;
        let mut raid_deadline = now + raid_offset;
        if first {
            // The host's tick callback is not guaranteed to fire at the
            // arming tick itself, so a zero offset at generation time must
            // land strictly in the future.
            warning_deadline = warning_deadline.max(now + 1);
            raid_deadline = raid_deadline.max(now + 1);
            self.first_cycle = false;
        }
        self.warning_deadlines.insert(map.id, warning_deadline);
        self.raid_deadlines.insert(map.id, raid_deadline);
        tracing::debug!(
            "Starting timers for faction {} ({:?}) | warning: {} raid: {}",
            self.target_label,
            faction,
            warning_deadline,
            raid_deadline
        );
        true
    }

    fn drop_map(&mut self, map: MapId) {
        self.warning_deadlines.remove(&map);
        self.raid_deadlines.remove(&map);
    }

    /// Advance the schedule by one host tick
    ///
    /// A no-op unless `now` is an exact hour boundary. Within one call the
    /// order is fixed: disablement re-evaluation, then the goodwill
    /// correction pulse, then per-map deadline processing over the map set
    /// captured at the start. A map suspended this tick never also fires.
    pub fn tick(&mut self, now: Tick, host: &mut HostServices) {
        if !self.time.is_hour_boundary(now) {
            return;
        }

        let change = self.reevaluate_state(host);
        self.goodwill_pulse(now, host);

        let resumed = change == StateChange::Resumed;
        let tracked: Vec<MapId> = self.warning_deadlines.keys().copied().collect();
        for map in tracked {
            match self.state {
                PursuitState::SuspendedTerminal => {
                    // Terminal suspension stops tracking the map for good
                    self.drop_map(map);
                    continue;
                }
                // Relations may recover; keep the timers for the restart
                PursuitState::SuspendedByRelations => continue,
                PursuitState::Active => {}
            }

            let Some(info) = host.maps.info(map) else {
                // Stale reference, purged opportunistically
                self.drop_map(map);
                continue;
            };
            if info.kind.is_pocket() {
                // Cleanup for timers armed before pocket maps were excluded
                self.drop_map(map);
                continue;
            }
            if resumed && !self.arm_timers(&info, now, true) {
                self.drop_map(map);
                continue;
            }

            let (Some(&warning_deadline), Some(&raid_deadline)) =
                (self.warning_deadlines.get(&map), self.raid_deadlines.get(&map))
            else {
                continue;
            };

            if now == self.time.ceil_to_unit(warning_deadline) && !self.config.warning_disabled {
                host.notices.deliver(self.warning_notification(host.factions));
            }
            if now == self.time.ceil_to_unit(raid_deadline) {
                self.fire_raid(map, FIRST_RAID_MULT, FIRST_RAID_FLOOR, host);
            }
            let second_wave = raid_deadline + self.time.from_hours(self.config.second_wave_hours);
            if now == self.time.ceil_to_unit(second_wave) {
                self.fire_raid(map, SECOND_WAVE_MULT, SECOND_WAVE_FLOOR, host);
            }
            if let Some(interval_hours) = self.config.endless_waves_hours {
                let interval = self.time.floor_interval(self.time.from_hours(interval_hours));
                if now > self.time.ceil_to_unit(second_wave) && now % interval == 0 {
                    self.fire_raid(map, ENDLESS_WAVE_MULT, ENDLESS_WAVE_FLOOR, host);
                }
            }
        }
    }

    /// Re-evaluate disablement against current faction state
    ///
    /// Idempotent: running it twice without an underlying change produces
    /// the same state and no duplicate notification.
    fn reevaluate_state(&mut self, host: &mut HostServices) -> StateChange {
        // Unresolved schedules are inert, not terminal; resolution may still
        // succeed after a later load.
        let Some(faction) = self.target_faction else {
            return StateChange::None;
        };

        let profile = host.factions.profile(faction);
        if self.state == PursuitState::SuspendedTerminal {
            if profile.as_ref().is_some_and(|p| !p.defunct) {
                // Structurally unreachable under normal host behavior
                tracing::warn!(
                    "Anomalous transition: defunct faction {} is live again; pursuit stays terminated",
                    self.target_label
                );
            }
            return StateChange::None;
        }

        match profile {
            None => self.enter_terminal(host),
            Some(p) if p.defunct => self.enter_terminal(host),
            Some(p) => {
                let permanent = self.config.permanent_enemy || p.permanent_enemy;
                if !permanent && !p.hostile_to_player {
                    if self.state == PursuitState::Active {
                        self.state = PursuitState::SuspendedByRelations;
                        self.cached_alert = None;
                        self.alert_map = None;
                        tracing::debug!("Suspending pursuit for faction {}", self.target_label);
                        host.notices.deliver(Notification::new(
                            format!("Pursuit suspended: {}", self.target_label),
                            format!(
                                "{} is no longer hostile. Their pursuit of your colony has been \
                                 called off for as long as relations hold.",
                                self.target_label
                            ),
                            Severity::Positive,
                        ));
                        StateChange::Suspended
                    } else {
                        StateChange::None
                    }
                } else if self.state == PursuitState::SuspendedByRelations {
                    self.state = PursuitState::Active;
                    self.cached_alert = None;
                    self.alert_map = None;
                    tracing::debug!("Resuming pursuit for faction {}", self.target_label);
                    host.notices.deliver(Notification::new(
                        format!("Pursuit resumed: {}", self.target_label),
                        format!(
                            "Relations with {} have soured again. Their forces are already \
                             moving; expect them sooner rather than later.",
                            self.target_label
                        ),
                        Severity::ThreatSmall,
                    ));
                    StateChange::Resumed
                } else {
                    StateChange::None
                }
            }
        }
    }

    fn enter_terminal(&mut self, host: &mut HostServices) -> StateChange {
        self.state = PursuitState::SuspendedTerminal;
        self.cached_alert = None;
        self.alert_map = None;
        tracing::debug!("Terminating pursuit for faction {}", self.target_label);
        host.notices.deliver(Notification::new(
            format!("Pursuit over: {}", self.target_label),
            format!(
                "{} is no more. Their pursuit of your colony ends here.",
                self.target_label
            ),
            Severity::Positive,
        ));
        StateChange::Terminated
    }

    /// Permanent-enemy override correction pulse
    ///
    /// Every 12 hours, while active and overriding a definition that is not
    /// natively a permanent enemy, goodwill that has drifted from -100 is
    /// snapped back with a single idempotent adjustment.
    fn goodwill_pulse(&self, now: Tick, host: &mut HostServices) {
        if !self.config.permanent_enemy || self.state.is_suspended() {
            return;
        }
        if now % (GOODWILL_PULSE_HOURS * self.time.ticks_per_hour()) != 0 {
            return;
        }
        let Some(faction) = self.target_faction else {
            return;
        };
        let Some(profile) = host.factions.profile(faction) else {
            return;
        };
        if profile.permanent_enemy {
            return;
        }
        let deficit = -(100 + profile.goodwill);
        if deficit != 0 {
            tracing::debug!(
                "Goodwill correction for {}: {} -> -100",
                self.target_label,
                profile.goodwill
            );
            host.notices.deliver(Notification::new(
                format!("{} will not relent", self.target_label),
                format!(
                    "{} refuses any improvement in relations. Their standing toward your \
                     colony has been forced back to open hostility.",
                    self.target_label
                ),
                Severity::Neutral,
            ));
            host.factions.adjust_goodwill(faction, deficit);
        }
    }

    fn fire_raid(&self, map: MapId, multiplier: f32, floor: f32, host: &mut HostServices) {
        let Some(faction) = self.target_faction else {
            return;
        };
        let points = (host.threat.default_threat_points(map) * multiplier).max(floor);
        let request = RaidRequest {
            map,
            faction,
            arrival: self.arrival_mode,
            strategy: RaidStrategy::ImmediateAttack,
            points,
            forced: true,
        };
        tracing::debug!(
            "Firing pursuit raid by {} with {} threat points",
            self.target_label,
            points
        );
        if !host.raids.execute(request) {
            tracing::warn!(
                "Host declined forced pursuit raid by {} against {:?}",
                self.target_label,
                map
            );
        }
    }

    fn warning_notification(&self, factions: &dyn FactionRegistry) -> Notification {
        let machine_swarm = self
            .target_faction
            .and_then(|f| factions.profile(f))
            .is_some_and(|p| p.machine_swarm);
        if machine_swarm {
            Notification::new(
                "Machine signal detected",
                "Your sensors have picked up encrypted machine chatter nearby. The swarm \
                 has found your colony, and an attack will follow soon.",
                Severity::ThreatSmall,
            )
        } else {
            Notification::new(
                format!("{} scouts sighted", self.target_label),
                format!(
                    "Scouts from {} have been spotted surveying your colony. A raid will \
                     follow soon.",
                    self.target_label
                ),
                Severity::ThreatSmall,
            )
        }
    }

    /// The current map's threat alert, regenerated lazily from schedule state
    ///
    /// `None` while pursuit is suspended, while the warning is disabled, for
    /// non-home maps and before the current map's warning deadline has
    /// passed. The cached value is invalidated whenever the current map
    /// changes; suspension transitions clear it eagerly.
    pub fn current_alert(&mut self, now: Tick, maps: &dyn MapDirectory) -> Option<&ThreatAlert> {
        if self.state.is_suspended() || self.config.warning_disabled {
            return None;
        }
        let current = maps.current_map()?;
        if !maps.info(current)?.player_home {
            return None;
        }
        if self.alert_map != Some(current) {
            self.cached_alert = None;
            self.alert_map = None;
        }
        if self.cached_alert.is_none() {
            let warning_deadline = *self.warning_deadlines.get(&current)?;
            if now > self.time.ceil_to_unit(warning_deadline) {
                let raid_deadline = *self.raid_deadlines.get(&current)?;
                self.cached_alert = Some(ThreatAlert {
                    raid_deadline,
                    faction_label: self.target_label.clone(),
                });
                self.alert_map = Some(current);
            }
        }
        self.cached_alert.as_ref()
    }

    /// One-shot diagnostic dump of configuration and state
    pub(crate) fn log_state(&self) {
        tracing::debug!(
            "Pursuit {} | state: {:?} first_cycle: {} arrival: {:?} permanent: {} \
             first raid: {}h +/-{}h raid: {}h +/-{}h warning(disabled {}): {}h +/-{}h \
             second wave: {}h endless: {:?}h maps tracked: {}",
            self.target_label,
            self.state,
            self.first_cycle,
            self.arrival_mode,
            self.config.permanent_enemy,
            self.config.first_raid.mean_hours,
            self.config.first_raid.variance_hours,
            self.config.raid.mean_hours,
            self.config.raid.variance_hours,
            self.config.warning_disabled,
            self.config.warning.mean_hours,
            self.config.warning.variance_hours,
            self.config.second_wave_hours,
            self.config.endless_waves_hours,
            self.warning_deadlines.len()
        );
    }
}
