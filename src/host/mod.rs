//! Host collaborator interfaces
//!
//! The pursuit core runs entirely inside the host's tick callback and talks
//! to the rest of the simulation through these traits. Nothing here blocks,
//! nothing is async; the host calls in once per tick and the core calls out
//! synchronously.

pub mod faction;
pub mod map;
pub mod notify;
pub mod raid;

pub use faction::{FactionProfile, FactionRegistry};
pub use map::{MapDirectory, MapInfo, MapKind};
pub use notify::{Notification, NotificationSink, Severity};
pub use raid::{ArrivalMode, RaidExecutor, RaidRequest, RaidStrategy, ThreatBaseline};

/// Borrowed bundle of every collaborator a schedule needs during one call
///
/// Passing one bundle keeps the tick signature stable as collaborators are
/// added, and lets tests assemble fakes piecemeal.
pub struct HostServices<'a> {
    pub factions: &'a mut dyn FactionRegistry,
    pub maps: &'a dyn MapDirectory,
    pub raids: &'a mut dyn RaidExecutor,
    pub threat: &'a dyn ThreatBaseline,
    pub notices: &'a mut dyn NotificationSink,
}
