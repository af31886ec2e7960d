//! Latency and failure knobs for the simulated connections.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing used by the simulated chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Lower bound of the connect delay, in milliseconds
    pub connect_min_ms: u64,
    /// Upper bound of the connect delay, in milliseconds
    pub connect_max_ms: u64,
    /// Delay before the first reply to a message
    pub reply_base_ms: u64,
    /// Extra delay per reply position, so replies arrive staggered
    pub reply_step_ms: u64,
    /// Probability in `[0, 1]` that a connect attempt ends in error
    pub failure_rate: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            connect_min_ms: 1000,
            connect_max_ms: 2000,
            reply_base_ms: 500,
            reply_step_ms: 300,
            failure_rate: 0.0,
        }
    }
}

impl SimulationSettings {
    /// Zero-latency settings, handy for scripted sessions.
    pub fn instant() -> Self {
        Self {
            connect_min_ms: 0,
            connect_max_ms: 0,
            reply_base_ms: 0,
            reply_step_ms: 0,
            failure_rate: 0.0,
        }
    }

    pub fn connect_range_ms(&self) -> RangeInclusive<u64> {
        self.connect_min_ms..=self.connect_max_ms
    }

    /// Delay of the reply at position `index` among the targets.
    pub fn reply_delay(&self, index: usize) -> Duration {
        let step = self.reply_step_ms.saturating_mul(index as u64);
        Duration::from_millis(self.reply_base_ms.saturating_add(step))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.connect_min_ms > self.connect_max_ms {
            anyhow::bail!(
                "connect_min_ms ({}) must not exceed connect_max_ms ({})",
                self.connect_min_ms,
                self.connect_max_ms
            );
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            anyhow::bail!(
                "failure_rate must be between 0.0 and 1.0 (got {})",
                self.failure_rate
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_delay_is_staggered() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.reply_delay(0), Duration::from_millis(500));
        assert_eq!(settings.reply_delay(1), Duration::from_millis(800));
        assert_eq!(settings.reply_delay(2), Duration::from_millis(1100));
    }

    #[test]
    fn test_validate() {
        assert!(SimulationSettings::default().validate().is_ok());

        let inverted = SimulationSettings {
            connect_min_ms: 3000,
            ..SimulationSettings::default()
        };
        assert!(inverted.validate().is_err());

        let bad_rate = SimulationSettings {
            failure_rate: 1.5,
            ..SimulationSettings::default()
        };
        assert!(bad_rate.validate().is_err());

        let nan_rate = SimulationSettings {
            failure_rate: f64::NAN,
            ..SimulationSettings::default()
        };
        assert!(nan_rate.validate().is_err());
    }
}
