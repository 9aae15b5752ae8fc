//! Runtime configuration for the sampling task.
//!
//! The estimation algorithm itself has no runtime options; its parameters are
//! in [`crate::constants`]. This only controls how readings are produced and
//! delivered.

use crate::constants::SAMPLE_RATE_HZ;
use crate::error::{PpgError, Result};

/// Sampling task configuration
///
/// # Example
/// ```
/// use ppgvitals::config::MonitorConfig;
///
/// let mut config = MonitorConfig::default();
/// config.report_spo2 = false;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Report heart rate whenever a beat interval is accepted
    pub report_heart_rate: bool,
    /// Report SpO2 at `spo2_output_rate_hz`
    pub report_spo2: bool,
    /// SpO2 reporting rate in Hz (the window changes every sample, readings need not)
    pub spo2_output_rate_hz: f32,
    /// Pace the sampling loop at the sample period instead of running flat out
    pub realtime: bool,
    /// Consecutive failed reads tolerated before the sampling task gives up
    pub max_consecutive_read_errors: u32,
    /// Capacity of the reading channel between sampling task and consumer
    pub channel_capacity: usize,
}

impl MonitorConfig {
    /// Samples between SpO2 reports, at least 1.
    pub fn spo2_interval_samples(&self) -> u64 {
        ((SAMPLE_RATE_HZ / self.spo2_output_rate_hz).round() as u64).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.report_heart_rate && !self.report_spo2 {
            return Err(PpgError::Config(
                "at least one of heart rate or SpO2 must be reported".to_string(),
            ));
        }
        if !(self.spo2_output_rate_hz > 0.0 && self.spo2_output_rate_hz <= SAMPLE_RATE_HZ) {
            return Err(PpgError::Config(format!(
                "SpO2 output rate must be in (0, {}] Hz, got {}",
                SAMPLE_RATE_HZ, self.spo2_output_rate_hz
            )));
        }
        if self.channel_capacity == 0 {
            return Err(PpgError::Config(
                "channel capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_heart_rate: true,
            report_spo2: true,
            spo2_output_rate_hz: 1.0,
            realtime: false,
            max_consecutive_read_errors: 5,
            channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spo2_interval_samples(), 50);
    }

    #[test]
    fn test_spo2_interval() {
        let mut config = MonitorConfig::default();
        config.spo2_output_rate_hz = 50.0;
        assert_eq!(config.spo2_interval_samples(), 1);
        config.spo2_output_rate_hz = 0.2;
        assert_eq!(config.spo2_interval_samples(), 250);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = MonitorConfig::default();
        config.report_heart_rate = false;
        config.report_spo2 = false;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.spo2_output_rate_hz = 0.0;
        assert!(config.validate().is_err());
        config.spo2_output_rate_hz = 100.0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.channel_capacity = 0;
        assert!(config.validate().is_err());
    }
}
