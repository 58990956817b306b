use std::time::Duration;

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::script::Phase;

/// Base duration of each timed phase, in milliseconds.
///
/// `final` has no entry: it is a terminal marker and never waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PhaseDurations {
  pub idle_ms:      u64,
  pub deleting_ms:  u64,
  pub moving_ms:    u64,
  pub inserting_ms: u64,
}

impl Default for PhaseDurations {
  fn default() -> Self {
    Self {
      idle_ms:      350,
      deleting_ms:  450,
      moving_ms:    600,
      inserting_ms: 450,
    }
  }
}

impl PhaseDurations {
  pub fn for_phase(&self, phase: Phase) -> Duration {
    let ms = match phase {
      Phase::Idle => self.idle_ms,
      Phase::Deleting => self.deleting_ms,
      Phase::Moving => self.moving_ms,
      Phase::Inserting => self.inserting_ms,
      Phase::Final => 0,
    };
    Duration::from_millis(ms)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
  #[error("speed must be a finite, non-negative multiplier (got {0})")]
  InvalidSpeed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MorphConfig {
  pub durations:                 PhaseDurations,
  /// How long the deleting phase lingers after letters are removed, so their
  /// exit animation finishes before anything moves.
  pub deletion_hold_ms:          u64,
  /// Multiplies every wait; `2.0` plays at half speed.
  pub speed:                     f64,
  pub reduced_motion:            bool,
  /// Upper bound for any single wait while `reduced_motion` is on.
  pub reduced_motion_ceiling_ms: u64,
}

impl Default for MorphConfig {
  fn default() -> Self {
    Self {
      durations:                 PhaseDurations::default(),
      deletion_hold_ms:          180,
      speed:                     1.0,
      reduced_motion:            false,
      reduced_motion_ceiling_ms: 120,
    }
  }
}

impl MorphConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.speed.is_finite() || self.speed < 0.0 {
      return Err(ConfigError::InvalidSpeed(self.speed));
    }
    Ok(())
  }

  pub fn deletion_hold(&self) -> Duration {
    Duration::from_millis(self.deletion_hold_ms)
  }

  pub fn reduced_motion_ceiling(&self) -> Duration {
    Duration::from_millis(self.reduced_motion_ceiling_ms)
  }

  /// The wait actually spent on a frame of base length `base`.
  ///
  /// An invalid speed leaves `base` unscaled.
  pub fn effective(&self, base: Duration) -> Duration {
    let scaled = if self.validate().is_ok() {
      // float to int casts saturate
      Duration::from_nanos((base.as_nanos() as f64 * self.speed).round() as u64)
    } else {
      base
    };

    if self.reduced_motion {
      scaled.min(self.reduced_motion_ceiling())
    } else {
      scaled
    }
  }
}
