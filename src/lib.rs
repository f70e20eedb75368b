//! Ruthless Pursuit - per-faction threat-escalation scheduling

pub mod aggregator;
pub mod core;
pub mod host;
pub mod schedule;
