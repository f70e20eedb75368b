//! Threat alert projection
//!
//! A `ThreatAlert` is a read-only view of one map's schedule state, used to
//! render the persistent warning indicator. It is regenerated lazily from
//! the schedule and never authoritative; everything it displays derives from
//! `now` against the captured raid deadline.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;
use crate::schedule::windows::TimeBase;

/// The alert turns to imminent emphasis this many ticks before the raid
/// deadline (24 hours at 2500 ticks per hour)
pub const IMMINENT_WINDOW_TICKS: Tick = 60_000;

/// Severity tier of a rendered alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Warning issued, raid still comfortably away
    Pending,
    /// Within 24 hours of the raid deadline; emphasis changes, text does not
    Imminent,
    /// Past the raid deadline; emphasis and message both change
    Critical,
}

/// Warning indicator for one map's pending pursuit raid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAlert {
    pub raid_deadline: Tick,
    pub faction_label: String,
}

impl ThreatAlert {
    pub fn severity(&self, now: Tick) -> AlertSeverity {
        if now > self.raid_deadline {
            AlertSeverity::Critical
        } else if now + IMMINENT_WINDOW_TICKS > self.raid_deadline {
            AlertSeverity::Imminent
        } else {
            AlertSeverity::Pending
        }
    }

    /// One-line label: a countdown until critical, then an overdue message
    pub fn label(&self, now: Tick, time: TimeBase) -> String {
        if self.severity(now) == AlertSeverity::Critical {
            format!("Pursuit by {}: raid imminent", self.faction_label)
        } else {
            format!(
                "Pursuit by {}: {}",
                self.faction_label,
                format_period(self.raid_deadline - now, time)
            )
        }
    }

    /// Longer body text for the alert inspector
    pub fn explanation(&self, now: Tick) -> String {
        if self.severity(now) == AlertSeverity::Critical {
            format!(
                "{} are attacking. Their raid on your colony is already underway or overdue.",
                self.faction_label
            )
        } else {
            format!(
                "{} know where your colony is and are preparing to raid it. The countdown \
                 shows roughly how long you have to prepare.",
                self.faction_label
            )
        }
    }
}

/// Render a tick span as whole days/hours, coarsest unit first
fn format_period(ticks: Tick, time: TimeBase) -> String {
    let hours = ticks / time.ticks_per_hour();
    let days = hours / 24;
    let rem_hours = hours % 24;
    if days > 0 && rem_hours > 0 {
        format!("{}d {}h", days, rem_hours)
    } else if days > 0 {
        format!("{}d", days)
    } else {
        // Anything under an hour still reads as 1h
        format!("{}h", rem_hours.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(deadline: Tick) -> ThreatAlert {
        ThreatAlert {
            raid_deadline: deadline,
            faction_label: "Iron Covenant".to_string(),
        }
    }

    #[test]
    fn test_severity_tiers() {
        let a = alert(200_000);
        assert_eq!(a.severity(100_000), AlertSeverity::Pending);
        // Exactly 60000 out is still pending (strict inequality)
        assert_eq!(a.severity(140_000), AlertSeverity::Pending);
        assert_eq!(a.severity(140_001), AlertSeverity::Imminent);
        assert_eq!(a.severity(200_000), AlertSeverity::Imminent);
        assert_eq!(a.severity(200_001), AlertSeverity::Critical);
    }

    #[test]
    fn test_countdown_label() {
        let time = TimeBase::new(2500);
        let a = alert(26 * 2500);
        assert_eq!(a.label(0, time), "Pursuit by Iron Covenant: 1d 2h");
        assert_eq!(a.label(2 * 2500, time), "Pursuit by Iron Covenant: 1d");
        assert_eq!(a.label(25 * 2500, time), "Pursuit by Iron Covenant: 1h");
        // Sub-hour remainder still renders as an hour
        assert_eq!(a.label(26 * 2500 - 10, time), "Pursuit by Iron Covenant: 1h");
    }

    #[test]
    fn test_critical_label() {
        let time = TimeBase::new(2500);
        let a = alert(1000);
        assert_eq!(a.label(5000, time), "Pursuit by Iron Covenant: raid imminent");
        assert!(a.explanation(5000).contains("underway"));
        assert!(a.explanation(0).contains("preparing to raid"));
    }
}
