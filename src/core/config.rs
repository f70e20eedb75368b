//! Pursuit configuration with documented defaults
//!
//! All timing knobs are expressed as a mean duration in in-game hours plus a
//! symmetric variance in hours. Conversion to ticks happens once, when the
//! timer windows are derived, never at the call sites.

use serde::{Deserialize, Serialize};

use crate::core::error::{PursuitError, Result};
use crate::host::raid::ArrivalMode;

/// Upper bound for every hour-valued field (ten in-game years)
pub const MAX_DELAY_HOURS: u32 = 14_400;

/// A mean/variance pair in hours
///
/// The derived tick window is `[mean - variance, mean + variance]`, with the
/// lower bound clamped at zero when the variance exceeds the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaySpec {
    pub mean_hours: u32,
    pub variance_hours: u32,
}

impl DelaySpec {
    pub fn new(mean_hours: u32, variance_hours: u32) -> Self {
        Self { mean_hours, variance_hours }
    }
}

/// Configuration for one pursuit schedule
///
/// This is the single defaults record: `PursuitConfig::default()` is the only
/// place the stock numbers appear, and both fresh schedules and save/load
/// fall back to it. The defaults reproduce the vanilla 18-35 day raid window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Delay before the very first raid against any map (26.5 days +/- 8.5)
    pub first_raid: DelaySpec,
    /// Delay before the raid on every subsequently armed map
    pub raid: DelaySpec,
    /// How long before the mean raid delay the warning arrives (11.5 days,
    /// +/- 1). The warning is tied to the raid delay, not an absolute time.
    pub warning: DelaySpec,
    /// Suppresses the warning notification and the on-screen alert. Timers
    /// still arm so the raid schedule itself is unaffected.
    pub warning_disabled: bool,
    /// Hours between the initial raid and the follow-up wave
    pub second_wave_hours: u32,
    /// Cadence of recurring raids after the second wave, in hours.
    /// `None` stops pursuit at the second wave, as vanilla does.
    pub endless_waves_hours: Option<u32>,
    /// Forces continuous hostility even when the faction definition is not
    /// natively a permanent enemy, by periodically resetting goodwill.
    pub permanent_enemy: bool,
    /// Degrade standing to clearly hostile at activation time. Only
    /// meaningful when the faction is not already a permanent enemy.
    pub start_hostile: bool,
    /// Whether this faction may still be picked as a source for unrelated,
    /// ordinary raid generation elsewhere in the host.
    pub allow_ordinary_raids: bool,
    /// How pursuit raiders enter a map. Downgraded to edge walk when the
    /// faction lacks flight capability.
    pub arrival_mode: ArrivalMode,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            first_raid: DelaySpec::new(636, 204),
            raid: DelaySpec::new(636, 204),
            warning: DelaySpec::new(276, 24),
            warning_disabled: false,
            second_wave_hours: 12,
            endless_waves_hours: Some(3),
            permanent_enemy: true,
            start_hostile: true,
            allow_ordinary_raids: false,
            arrival_mode: ArrivalMode::DropIn,
        }
    }
}

impl PursuitConfig {
    /// Validate field ranges
    ///
    /// A zero raid delay could re-fire every aligned tick, so the raid means
    /// and the wave intervals have a floor of one hour. One hour is
    /// near-unplayable but allowed; the host UI is expected to warn, not us.
    pub fn validate(&self) -> Result<()> {
        if self.first_raid.mean_hours == 0 || self.raid.mean_hours == 0 {
            return Err(PursuitError::InvalidConfig(
                "raid mean delay must be at least one hour".to_string(),
            ));
        }
        if self.second_wave_hours == 0 {
            return Err(PursuitError::InvalidConfig(
                "second wave delay must be at least one hour".to_string(),
            ));
        }
        if self.endless_waves_hours == Some(0) {
            return Err(PursuitError::InvalidConfig(
                "endless wave interval must be at least one hour".to_string(),
            ));
        }
        let hour_fields = [
            self.first_raid.mean_hours,
            self.first_raid.variance_hours,
            self.raid.mean_hours,
            self.raid.variance_hours,
            self.warning.mean_hours,
            self.warning.variance_hours,
            self.second_wave_hours,
            self.endless_waves_hours.unwrap_or(0),
        ];
        if hour_fields.iter().any(|&h| h > MAX_DELAY_HOURS) {
            return Err(PursuitError::InvalidConfig(format!(
                "delay fields are capped at {} hours",
                MAX_DELAY_HOURS
            )));
        }
        Ok(())
    }

    /// Parse a config from TOML, validating ranges
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PursuitConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
