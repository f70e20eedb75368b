//! Headless Pursuit Simulator
//!
//! Drives a pursuit aggregator against a tiny in-memory host for a scripted
//! number of in-game days and prints the raid/notification timeline. Useful
//! for eyeballing pacing changes to a config before wiring it into a host.

use std::collections::HashMap;

use clap::Parser;
use ruthless_pursuit::aggregator::{AggregatorConfig, ScheduleAggregator};
use ruthless_pursuit::core::config::PursuitConfig;
use ruthless_pursuit::core::types::{FactionDefId, FactionId, MapId, Tick};
use ruthless_pursuit::host::{
    FactionProfile, FactionRegistry, HostServices, MapDirectory, MapInfo, MapKind, Notification,
    NotificationSink, RaidExecutor, RaidRequest, ThreatBaseline,
};
use ruthless_pursuit::schedule::TimeBase;

/// Headless Pursuit Simulator - scripted pursuit timelines for config tuning
#[derive(Parser, Debug)]
#[command(name = "pursuit_sim")]
#[command(about = "Run a pursuit schedule against a scripted in-memory host")]
struct Args {
    /// Optional TOML pursuit config (defaults to the stock numbers)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// In-game days to simulate
    #[arg(long, default_value_t = 120)]
    days: u64,

    /// Ticks per in-game hour
    #[arg(long, default_value_t = 2500)]
    ticks_per_hour: u64,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Day on which the faction sues for peace (demo of suspension);
    /// relations sour again ten days later. Only visible with a config
    /// where permanent_enemy = false.
    #[arg(long)]
    peace_day: Option<u64>,
}

struct SimFactions {
    profiles: HashMap<FactionId, FactionProfile>,
    order: Vec<FactionId>,
}

impl FactionRegistry for SimFactions {
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
            p.hostile_to_player = p.goodwill <= -75;
        }
    }
}

struct SimMaps {
    home: MapInfo,
}

impl MapDirectory for SimMaps {
    fn live_maps(&self) -> Vec<MapId> {
        vec![self.home.id]
    }

    fn info(&self, map: MapId) -> Option<MapInfo> {
        (map == self.home.id).then(|| self.home.clone())
    }

    fn current_map(&self) -> Option<MapId> {
        Some(self.home.id)
    }
}

struct RaidLog {
    raids: Vec<(Tick, RaidRequest)>,
    now: Tick,
    ticks_per_day: f64,
}

impl RaidExecutor for RaidLog {
    fn execute(&mut self, raid: RaidRequest) -> bool {
        tracing::info!(
            "day {:>5.1}: raid lands, {} points, {:?}",
            self.now as f64 / self.ticks_per_day,
            raid.points,
            raid.arrival
        );
        self.raids.push((self.now, raid));
        true
    }
}

struct FlatThreat;

impl ThreatBaseline for FlatThreat {
    fn default_threat_points(&self, _map: MapId) -> f32 {
        1200.0
    }
}

struct NoticeLog {
    notices: Vec<(Tick, Notification)>,
    now: Tick,
    ticks_per_day: f64,
}

impl NotificationSink for NoticeLog {
    fn deliver(&mut self, notice: Notification) {
        tracing::info!(
            "day {:>5.1}: [{:?}] {}",
            self.now as f64 / self.ticks_per_day,
            notice.severity,
            notice.title
        );
        self.notices.push((self.now, notice));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Cannot read {}: {}", path.display(), e);
                std::process::exit(1);
            });
            PursuitConfig::from_toml_str(&content).unwrap_or_else(|e| {
                eprintln!("Bad config: {}", e);
                std::process::exit(1);
            })
        }
        None => PursuitConfig::default(),
    };

    let time = TimeBase::new(args.ticks_per_hour);
    let faction = FactionId::new();
    let mut factions = SimFactions {
        profiles: HashMap::from([(
            faction,
            FactionProfile {
                id: faction,
                def: FactionDefId::new("IronCovenant"),
                label: "Iron Covenant".to_string(),
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
        )]),
        order: vec![faction],
    };
    let maps = SimMaps {
        home: MapInfo {
            id: MapId::new(),
            kind: MapKind::Surface,
            player_home: true,
            staging_ground_of: None,
        },
    };
    let ticks_per_day = args.ticks_per_hour as f64 * 24.0;
    let mut raids = RaidLog {
        raids: Vec::new(),
        now: 0,
        ticks_per_day,
    };
    let mut notices = NoticeLog {
        notices: Vec::new(),
        now: 0,
        ticks_per_day,
    };

    let mut aggregator =
        ScheduleAggregator::new(config, AggregatorConfig::default(), time);
    {
        let mut host = HostServices {
            factions: &mut factions,
            maps: &maps,
            raids: &mut raids,
            threat: &FlatThreat,
            notices: &mut notices,
        };
        aggregator.generate(0, &mut host, args.seed);
    }

    let hours = args.days * 24;
    let peace_hours = args.peace_day.map(|d| (d * 24, (d + 10) * 24));
    tracing::info!(
        "Simulating {} days of pursuit ({} schedules)",
        args.days,
        aggregator.schedules().len()
    );

    for hour in 1..=hours {
        let now = hour * args.ticks_per_hour;
        if let Some((start, end)) = peace_hours {
            if hour == start {
                tracing::info!("day {:.1}: scripted peace deal", hour as f64 / 24.0);
                factions.adjust_goodwill(faction, 200);
            }
            if hour == end {
                tracing::info!("day {:.1}: scripted betrayal", hour as f64 / 24.0);
                factions.adjust_goodwill(faction, -200);
            }
        }
        raids.now = now;
        notices.now = now;
        let mut host = HostServices {
            factions: &mut factions,
            maps: &maps,
            raids: &mut raids,
            threat: &FlatThreat,
            notices: &mut notices,
        };
        aggregator.tick(now, &mut host);
    }

    println!();
    println!("=== Pursuit summary ===");
    println!("Days simulated:  {}", args.days);
    println!("Raids fired:     {}", raids.raids.len());
    println!("Notifications:   {}", notices.notices.len());
    if let Some((tick, raid)) = raids.raids.first() {
        println!(
            "First raid:      day {:.1} at {} points",
            *tick as f64 / (args.ticks_per_hour as f64 * 24.0),
            raid.points
        );
    }
}
