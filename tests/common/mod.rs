//! In-memory fakes of the host collaborator traits
#![allow(dead_code)]

use std::collections::HashMap;

use ruthless_pursuit::core::types::{FactionDefId, FactionId, MapId};
use ruthless_pursuit::host::{
    FactionProfile, FactionRegistry, HostServices, MapDirectory, MapInfo, MapKind, Notification,
    NotificationSink, RaidExecutor, RaidRequest, ThreatBaseline,
};

pub struct FakeFactions {
    pub profiles: HashMap<FactionId, FactionProfile>,
    pub order: Vec<FactionId>,
}

impl FakeFactions {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a hostile, attack-capable, selectable faction
    pub fn add(&mut self, def: &str, label: &str) -> FactionId {
        let id = FactionId::new();
        self.profiles.insert(
            id,
            FactionProfile {
                id,
                def: FactionDefId::new(def),
                label: label.to_string(),
                is_player: false,
                selectable: true,
                can_stage_attacks: true,
                permanent_enemy: false,
                hostile_to_player: true,
                defunct: false,
                goodwill: -100,
                has_flight: true,
                machine_swarm: false,
            },
        );
        self.order.push(id);
        id
    }

    pub fn profile_mut(&mut self, id: FactionId) -> &mut FactionProfile {
        self.profiles.get_mut(&id).unwrap()
    }

    pub fn set_hostile(&mut self, id: FactionId, hostile: bool) {
        self.profile_mut(id).hostile_to_player = hostile;
    }

    pub fn set_defunct(&mut self, id: FactionId, defunct: bool) {
        self.profile_mut(id).defunct = defunct;
    }
}

impl FactionRegistry for FakeFactions {
    fn factions(&self) -> Vec<FactionId> {
        self.order.clone()
    }

    fn profile(&self, faction: FactionId) -> Option<FactionProfile> {
        self.profiles.get(&faction).cloned()
    }

    fn resolve_by_definition(&self, def: &FactionDefId) -> Vec<FactionId> {
        self.order
            .iter()
            .filter(|id| self.profiles[id].def == *def)
            .copied()
            .collect()
    }

    fn adjust_goodwill(&mut self, faction: FactionId, delta: i32) {
        if let Some(p) = self.profiles.get_mut(&faction) {
            p.goodwill = (p.goodwill + delta).clamp(-100, 100);
        }
    }
}

#[derive(Default)]
pub struct FakeMaps {
    pub maps: HashMap<MapId, MapInfo>,
    pub current: Option<MapId>,
}

impl FakeMaps {
    pub fn add(&mut self, kind: MapKind, player_home: bool) -> MapId {
        let id = MapId::new();
        self.maps.insert(
            id,
            MapInfo {
                id,
                kind,
                player_home,
                staging_ground_of: None,
            },
        );
        if self.current.is_none() {
            self.current = Some(id);
        }
        id
    }

    pub fn add_staging_ground(&mut self, def: &str) -> MapId {
        let id = self.add(MapKind::Surface, false);
        self.maps.get_mut(&id).unwrap().staging_ground_of = Some(FactionDefId::new(def));
        id
    }

    pub fn destroy(&mut self, map: MapId) {
        self.maps.remove(&map);
        if self.current == Some(map) {
            self.current = None;
        }
    }
}

impl MapDirectory for FakeMaps {
    fn live_maps(&self) -> Vec<MapId> {
        self.maps.keys().copied().collect()
    }

    fn info(&self, map: MapId) -> Option<MapInfo> {
        self.maps.get(&map).cloned()
    }

    fn current_map(&self) -> Option<MapId> {
        self.current
    }
}

#[derive(Default)]
pub struct RaidLog {
    pub raids: Vec<RaidRequest>,
    /// Tick recorded alongside each raid, set by the test loop
    pub now: u64,
    pub fired_at: Vec<u64>,
}

impl RaidExecutor for RaidLog {
    fn execute(&mut self, raid: RaidRequest) -> bool {
        self.fired_at.push(self.now);
        self.raids.push(raid);
        true
    }
}

pub struct FlatThreat(pub f32);

impl ThreatBaseline for FlatThreat {
    fn default_threat_points(&self, _map: MapId) -> f32 {
        self.0
    }
}

#[derive(Default)]
pub struct NoticeLog {
    pub notices: Vec<Notification>,
}

impl NoticeLog {
    pub fn titles(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.title.as_str()).collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.notices
            .iter()
            .filter(|n| n.title.contains(needle))
            .count()
    }
}

impl NotificationSink for NoticeLog {
    fn deliver(&mut self, notice: Notification) {
        self.notices.push(notice);
    }
}

/// Everything a test needs to drive a schedule
pub struct FakeHost {
    pub factions: FakeFactions,
    pub maps: FakeMaps,
    pub raids: RaidLog,
    pub threat: FlatThreat,
    pub notices: NoticeLog,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            factions: FakeFactions::new(),
            maps: FakeMaps::default(),
            raids: RaidLog::default(),
            threat: FlatThreat(1000.0),
            notices: NoticeLog::default(),
        }
    }

    pub fn services(&mut self) -> HostServices<'_> {
        HostServices {
            factions: &mut self.factions,
            maps: &self.maps,
            raids: &mut self.raids,
            threat: &self.threat,
            notices: &mut self.notices,
        }
    }
}
