/// Pulse detector for normalized PPG samples
///
/// Detects rising-edge crossings of an adaptive threshold and enforces a
/// refractory dead-time after every accepted pulse so one beat is never
/// counted twice.
///
/// Time is measured on an external, monotonically increasing sample counter
/// supplied by the caller. While the detector is refractory, samples are
/// dropped without being remembered, so the first sample after the dead-time
/// is compared against the value that triggered the last pulse.
#[derive(Debug, Clone)]
pub struct PulseDetector {
    threshold: f32,
    refractory_samples: u64,
    last_value: f32,
    in_refractory: bool,
    last_peak: Option<u64>,
}

impl PulseDetector {
    /// Create a new pulse detector
    ///
    /// # Arguments
    /// * `refractory_samples` - Samples after a pulse during which detection is suppressed
    pub fn new(refractory_samples: u64) -> Self {
        Self {
            threshold: 0.0,
            refractory_samples,
            last_value: 0.0,
            in_refractory: false,
            last_peak: None,
        }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Sample counter value of the most recent accepted pulse
    pub fn last_peak(&self) -> Option<u64> {
        self.last_peak
    }

    pub fn in_refractory(&self) -> bool {
        self.in_refractory
    }

    /// Offer the next sample to the detector
    ///
    /// Returns `true` if `value` completes an upward crossing of the threshold
    /// and the refractory dead-time since the last pulse has elapsed.
    ///
    /// # Arguments
    /// * `value` - Normalized sample (AC / DC)
    /// * `sample_counter` - Absolute index of this sample
    pub fn detect(&mut self, value: f32, sample_counter: u64) -> bool {
        if self.in_refractory {
            let elapsed = self
                .last_peak
                .map_or(u64::MAX, |peak| sample_counter.saturating_sub(peak));
            if elapsed <= self.refractory_samples {
                return false;
            }
            self.in_refractory = false;
        }

        let rising = self.last_value < self.threshold && value >= self.threshold;
        self.last_value = value;

        if !rising {
            return false;
        }

        self.last_peak = Some(sample_counter);
        self.in_refractory = true;
        true
    }
}
