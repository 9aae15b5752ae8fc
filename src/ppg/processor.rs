use crate::constants::{
    DC_ALPHA, MIN_DC_LEVEL, MIN_PEAK_THRESHOLD, PEAK_THRESHOLD_FRACTION, REFRACTORY_SAMPLES,
    SAMPLE_RATE_HZ, WINDOW_SIZE,
};
use crate::error::NoReading;
use crate::signal_processing::{DcTracker, PulseDetector, rms};

use super::heart_rate::HeartRateEstimator;
use super::spo2::{self, ChannelLevels};
use super::window::{SampleWindow, WindowEntry};

/// Windowed heart-rate and SpO2 processor for one RED/IR sensor pair
///
/// Feed one sample per sampling period with [`add_sample`](Self::add_sample),
/// then query [`compute_heart_rate`](Self::compute_heart_rate) and
/// [`compute_spo2`](Self::compute_spo2). Both queries fail with a
/// [`NoReading`] reason until the window has filled.
///
/// All state, including the heart-rate history, belongs to the instance, so
/// separate sensors need separate processors and never interfere. Memory is
/// fixed at construction; boxing the processor keeps the window off small
/// task stacks.
///
/// # Example
/// ```
/// use ppgvitals::{NoReading, PpgWindowProcessor};
///
/// let mut processor = PpgWindowProcessor::new();
/// processor.add_sample(40_000, 50_000);
/// assert_eq!(processor.compute_spo2(), Err(NoReading::WindowNotFilled));
/// ```
#[derive(Debug, Clone)]
pub struct PpgWindowProcessor {
    window: SampleWindow<WINDOW_SIZE>,
    dc_red: DcTracker,
    dc_ir: DcTracker,
    detector: PulseDetector,
    heart_rate: HeartRateEstimator,
    sample_counter: u64,
}

impl PpgWindowProcessor {
    pub fn new() -> Self {
        Self {
            window: SampleWindow::new(),
            dc_red: DcTracker::new(DC_ALPHA),
            dc_ir: DcTracker::new(DC_ALPHA),
            detector: PulseDetector::new(REFRACTORY_SAMPLES),
            heart_rate: HeartRateEstimator::new(SAMPLE_RATE_HZ),
            sample_counter: 0,
        }
    }

    /// Add one RED/IR intensity pair
    ///
    /// Updates the DC baselines, stores the raw and AC values and, once the
    /// window is full, refreshes the pulse threshold from the whole window.
    pub fn add_sample(&mut self, red: u32, ir: u32) {
        let ac_red = self.dc_red.update(red as f32);
        let ac_ir = self.dc_ir.update(ir as f32);

        self.window.push(WindowEntry {
            red,
            ir,
            ac_red,
            ac_ir,
        });
        self.sample_counter += 1;

        if self.window.is_filled() {
            self.update_threshold();
        }
    }

    fn update_threshold(&mut self) {
        let dc_ir = self.dc_ir.baseline().max(MIN_DC_LEVEL);
        let threshold =
            (PEAK_THRESHOLD_FRACTION * rms(self.window.ac_ir()) / dc_ir).max(MIN_PEAK_THRESHOLD);
        self.detector.set_threshold(threshold);
    }

    /// Check the newest sample for a pulse and report the heart rate
    ///
    /// Call once per [`add_sample`](Self::add_sample); a rate is reported only
    /// on the sample that completes a pulse, from the interval since the
    /// previous one.
    pub fn compute_heart_rate(&mut self) -> Result<f32, NoReading> {
        if !self.window.is_filled() {
            return Err(NoReading::WindowNotFilled);
        }

        let dc_ir = self.dc_ir.baseline();
        if dc_ir < MIN_DC_LEVEL {
            return Err(NoReading::NoSignal);
        }

        let Some(latest) = self.window.latest() else {
            return Err(NoReading::WindowNotFilled);
        };

        if !self.detector.detect(latest.ac_ir / dc_ir, self.sample_counter) {
            return Err(NoReading::NoPeak);
        }

        log::debug!(
            "Pulse at sample {} (threshold {:.4})",
            self.sample_counter,
            self.detector.threshold()
        );

        let bpm = self.heart_rate.on_peak(self.sample_counter)?;
        log::debug!("Heart rate {:.1} BPM", bpm);
        Ok(bpm)
    }

    /// Estimate SpO2 from the current window
    ///
    /// Pure function of the window state: repeated calls without new samples
    /// return the same result.
    pub fn compute_spo2(&self) -> Result<f32, NoReading> {
        if !self.window.is_filled() {
            return Err(NoReading::WindowNotFilled);
        }

        let red = ChannelLevels {
            ac_rms: rms(self.window.ac_red()),
            dc: self.dc_red.baseline(),
        };
        let ir = ChannelLevels {
            ac_rms: rms(self.window.ac_ir()),
            dc: self.dc_ir.baseline(),
        };
        spo2::estimate(red, ir)
    }

    pub fn window(&self) -> &SampleWindow<WINDOW_SIZE> {
        &self.window
    }

    pub fn is_filled(&self) -> bool {
        self.window.is_filled()
    }

    pub fn dc_red(&self) -> f32 {
        self.dc_red.baseline()
    }

    pub fn dc_ir(&self) -> f32 {
        self.dc_ir.baseline()
    }

    pub fn peak_threshold(&self) -> f32 {
        self.detector.threshold()
    }

    /// Number of samples ever added
    pub fn sample_count(&self) -> u64 {
        self.sample_counter
    }

    /// Sample count at the most recent accepted pulse
    pub fn last_peak_index(&self) -> Option<u64> {
        self.detector.last_peak()
    }
}

impl Default for PpgWindowProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_constant(processor: &mut PpgWindowProcessor, red: u32, ir: u32, n: usize) {
        for _ in 0..n {
            processor.add_sample(red, ir);
            let _ = processor.compute_heart_rate();
        }
    }

    #[test]
    fn test_warm_up() {
        let mut processor = PpgWindowProcessor::new();
        for _ in 0..WINDOW_SIZE - 1 {
            processor.add_sample(40_000, 50_000);
            assert_eq!(
                processor.compute_heart_rate(),
                Err(NoReading::WindowNotFilled)
            );
            assert_eq!(processor.compute_spo2(), Err(NoReading::WindowNotFilled));
        }
        assert_eq!(processor.peak_threshold(), 0.0);

        processor.add_sample(40_000, 50_000);
        assert!(processor.is_filled());
        assert!(processor.peak_threshold() >= MIN_PEAK_THRESHOLD);
    }

    #[test]
    fn test_dc_follows_constant_input() {
        let mut processor = PpgWindowProcessor::new();
        feed_constant(&mut processor, 40_000, 50_000, 50);
        assert!((processor.dc_red() - 40_000.0).abs() < 400.0);
        assert!((processor.dc_ir() - 50_000.0).abs() < 500.0);
    }

    #[test]
    fn test_threshold_floor_on_flat_signal() {
        let mut processor = PpgWindowProcessor::new();
        feed_constant(&mut processor, 40_000, 50_000, WINDOW_SIZE * 2);
        assert!((processor.peak_threshold() - MIN_PEAK_THRESHOLD).abs() < 1e-6);
        assert_eq!(processor.last_peak_index(), None);
    }

    #[test]
    fn test_dark_sensor_is_no_signal() {
        let mut processor = PpgWindowProcessor::new();
        for _ in 0..WINDOW_SIZE {
            processor.add_sample(0, 0);
        }
        assert_eq!(processor.compute_heart_rate(), Err(NoReading::NoSignal));
        assert_eq!(processor.compute_spo2(), Err(NoReading::NoSignal));
    }

    #[test]
    fn test_spike_pair_gives_rate() {
        let mut processor = PpgWindowProcessor::new();
        feed_constant(&mut processor, 40_000, 50_000, WINDOW_SIZE);

        processor.add_sample(40_000, 52_000);
        assert_eq!(processor.compute_heart_rate(), Err(NoReading::FirstPeak));
        let first = processor.last_peak_index();
        assert_eq!(first, Some(WINDOW_SIZE as u64 + 1));

        feed_constant(&mut processor, 40_000, 50_000, 24);

        processor.add_sample(40_000, 52_000);
        // 25 samples at 50 Hz = 0.5 s
        let bpm = processor.compute_heart_rate().unwrap();
        assert!((bpm - 120.0).abs() < 1e-3, "got {}", bpm);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = PpgWindowProcessor::new();
        let mut b = PpgWindowProcessor::new();
        feed_constant(&mut a, 40_000, 50_000, WINDOW_SIZE);
        feed_constant(&mut b, 40_000, 50_000, WINDOW_SIZE);

        a.add_sample(40_000, 52_000);
        assert_eq!(a.compute_heart_rate(), Err(NoReading::FirstPeak));

        // b has never seen a pulse, so its first one must not pair with a's
        feed_constant(&mut b, 40_000, 50_000, 24);
        b.add_sample(40_000, 52_000);
        assert_eq!(b.compute_heart_rate(), Err(NoReading::FirstPeak));
    }
}
