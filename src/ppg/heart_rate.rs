use crate::constants::{MAX_BPM, MAX_PERIOD_SECS, MIN_BPM, MIN_PERIOD_SECS};
use crate::error::NoReading;

/// Converts successive pulse positions into beats per minute.
///
/// Keeps the index of the previous pulse so a rate can be reported from the
/// interval to the next one. The previous index advances on every pulse,
/// including pulses whose interval is rejected, so a long dropout costs one
/// reading rather than blocking all later ones.
#[derive(Debug, Clone)]
pub struct HeartRateEstimator {
    sample_rate_hz: f32,
    previous_peak: Option<u64>,
}

impl HeartRateEstimator {
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            previous_peak: None,
        }
    }

    /// Feed the sample index of a newly accepted pulse.
    pub fn on_peak(&mut self, peak: u64) -> Result<f32, NoReading> {
        let Some(previous) = self.previous_peak.replace(peak) else {
            return Err(NoReading::FirstPeak);
        };

        let delta = match peak.checked_sub(previous) {
            Some(d) if d > 0 => d,
            _ => return Err(NoReading::ImplausiblePeriod),
        };

        let period_secs = delta as f32 / self.sample_rate_hz;
        if period_secs <= MIN_PERIOD_SECS || period_secs >= MAX_PERIOD_SECS {
            log::debug!("Rejected beat period {:.2}s", period_secs);
            return Err(NoReading::ImplausiblePeriod);
        }

        let bpm = 60.0 / period_secs;
        if !(MIN_BPM..=MAX_BPM).contains(&bpm) {
            return Err(NoReading::ImplausibleRate);
        }

        Ok(bpm)
    }

    pub fn previous_peak(&self) -> Option<u64> {
        self.previous_peak
    }
}
