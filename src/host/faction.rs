//! Faction/diplomacy registry interface
//!
//! The schedule never reaches into host state directly; everything it needs
//! to know about a faction is read through this trait, which unit tests
//! implement with in-memory fakes.

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionDefId, FactionId};

/// A read-only view of one live faction, captured at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionProfile {
    pub id: FactionId,
    pub def: FactionDefId,
    /// Display name, also used as the disambiguation key when several
    /// factions share a definition
    pub label: String,
    pub is_player: bool,
    /// Shown in the faction-selection configuration screen
    pub selectable: bool,
    pub can_stage_attacks: bool,
    /// The definition's own permanent-enemy flag (not the schedule override)
    pub permanent_enemy: bool,
    pub hostile_to_player: bool,
    /// Deactivated or defeated; a pursuing schedule treats this as terminal
    pub defunct: bool,
    /// Standing toward the player, -100 (hostile) to 100 (ally)
    pub goodwill: i32,
    /// Whether the faction's technology supports airborne arrival modes
    pub has_flight: bool,
    /// The default aggressive-machine faction gets dedicated warning wording
    /// and never raids its own staging ground
    pub machine_swarm: bool,
}

/// Faction/diplomacy registry, supplied by the host
pub trait FactionRegistry {
    /// All live factions, in world discovery order
    fn factions(&self) -> Vec<FactionId>;

    /// Current profile of one faction, `None` if it no longer exists
    fn profile(&self, faction: FactionId) -> Option<FactionProfile>;

    /// All live factions spawned from the given definition
    fn resolve_by_definition(&self, def: &FactionDefId) -> Vec<FactionId>;

    /// Shift goodwill toward the player by `delta`, clamped by the host
    fn adjust_goodwill(&mut self, faction: FactionId, delta: i32);
}
