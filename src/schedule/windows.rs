//! Timer window derivation and tick alignment
//!
//! All scheduling math lives here: converting hour-based mean/variance pairs
//! into integer tick windows, and aligning raw deadlines against the hourly
//! evaluation boundary. The schedule itself only compares aligned values.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{DelaySpec, PursuitConfig};
use crate::core::types::Tick;

/// Conversion between in-game hours and raw ticks
///
/// The host supplies ticks-per-hour once per session and it never changes.
/// Schedules only evaluate on exact hour boundaries, which bounds the work
/// per hour to O(1) regardless of the underlying tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBase {
    ticks_per_hour: Tick,
}

impl TimeBase {
    pub fn new(ticks_per_hour: Tick) -> Self {
        // A zero unit would divide by zero everywhere; clamp rather than fail
        Self {
            ticks_per_hour: ticks_per_hour.max(1),
        }
    }

    pub fn ticks_per_hour(&self) -> Tick {
        self.ticks_per_hour
    }

    pub fn from_hours(&self, hours: u32) -> Tick {
        hours as Tick * self.ticks_per_hour
    }

    pub fn is_hour_boundary(&self, now: Tick) -> bool {
        now % self.ticks_per_hour == 0
    }

    /// Round a raw deadline up to the next hourly boundary
    ///
    /// Deadlines are compared with `==` against an hourly `now`, so rounding
    /// up guarantees firing on or after the drawn tick, never early.
    pub fn ceil_to_unit(&self, deadline: Tick) -> Tick {
        (deadline + self.ticks_per_hour - 1) / self.ticks_per_hour * self.ticks_per_hour
    }

    /// Round a raw interval down to a whole number of hourly units
    ///
    /// Used as a modulus for the endless-wave cadence. Floored so the period
    /// never drifts past the configured value, clamped to one unit so a
    /// sub-hour interval cannot become a zero modulus.
    pub fn floor_interval(&self, interval: Tick) -> Tick {
        (interval / self.ticks_per_hour * self.ticks_per_hour).max(self.ticks_per_hour)
    }
}

/// Inclusive range of tick offsets a deadline is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickWindow {
    pub min: Tick,
    pub max: Tick,
}

impl TickWindow {
    /// `[mean - variance, mean + variance]` in ticks, lower bound clamped at
    /// zero when the variance exceeds the mean
    fn from_delay(delay: DelaySpec, base: TimeBase) -> Self {
        Self {
            min: base.from_hours(delay.mean_hours.saturating_sub(delay.variance_hours)),
            max: base.from_hours(delay.mean_hours + delay.variance_hours),
        }
    }

    /// Warning window anchored to a raid delay: the absolute warning offset
    /// is `max(raid_mean - warning_mean, 0)`, then the variance applies with
    /// the same zero clamp
    fn warning_before(raid_mean_hours: u32, warning: DelaySpec, base: TimeBase) -> Self {
        let absolute = raid_mean_hours.saturating_sub(warning.mean_hours);
        Self {
            min: base.from_hours(absolute.saturating_sub(warning.variance_hours)),
            max: base.from_hours(absolute + warning.variance_hours),
        }
    }

    /// Uniform draw over the inclusive window
    pub fn draw(&self, rng: &mut impl Rng) -> Tick {
        rng.gen_range(self.min..=self.max)
    }
}

/// The three windows a schedule draws deadlines from, derived once per
/// configuration change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerWindows {
    pub raid: TickWindow,
    pub first_raid: TickWindow,
    /// Warning anchored to the steady-state raid delay
    pub warning: TickWindow,
    /// Warning anchored to the first-raid delay, used while the schedule is
    /// still in its first cycle
    pub first_warning: TickWindow,
}

impl TimerWindows {
    pub fn derive(config: &PursuitConfig, base: TimeBase) -> Self {
        Self {
            raid: TickWindow::from_delay(config.raid, base),
            first_raid: TickWindow::from_delay(config.first_raid, base),
            warning: TickWindow::warning_before(config.raid.mean_hours, config.warning, base),
            first_warning: TickWindow::warning_before(
                config.first_raid.mean_hours,
                config.warning,
                base,
            ),
        }
    }
}
