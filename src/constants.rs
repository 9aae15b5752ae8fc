//! Fixed parameters of the PPG estimation algorithm
//!
//! These are calibration data for the processor, not runtime options. The
//! processor assumes samples arrive at exactly [`SAMPLE_RATE_HZ`].

/// Number of samples held in the analysis window.
pub const WINDOW_SIZE: usize = 100;

/// Sampling rate the processor assumes, in Hz (one sample every 20 ms).
pub const SAMPLE_RATE_HZ: f32 = 50.0;

/// Smoothing factor of the DC baseline low-pass: `dc = α·dc + (1-α)·raw`.
pub const DC_ALPHA: f32 = 0.95;

/// Dead-time after an accepted pulse during which detections are suppressed.
pub const REFRACTORY_SECS: f32 = 0.3;

/// Refractory dead-time expressed in samples at [`SAMPLE_RATE_HZ`].
pub const REFRACTORY_SAMPLES: u64 = (REFRACTORY_SECS * SAMPLE_RATE_HZ) as u64;

/// Fraction of the window's relative AC RMS used as the peak threshold.
pub const PEAK_THRESHOLD_FRACTION: f32 = 0.5;

/// Floor of the adaptive peak threshold (relative to DC).
pub const MIN_PEAK_THRESHOLD: f32 = 0.001;

/// Baselines below this level mean no finger is on the sensor.
pub const MIN_DC_LEVEL: f32 = 1.0;

/// Shortest accepted beat period in seconds (exclusive).
pub const MIN_PERIOD_SECS: f32 = 0.3;

/// Longest accepted beat period in seconds (exclusive).
pub const MAX_PERIOD_SECS: f32 = 2.0;

pub const MIN_BPM: f32 = 30.0;
pub const MAX_BPM: f32 = 220.0;

/// Minimum relative AC amplitude (RMS / DC) for a channel to count as perfused.
pub const MIN_PERFUSION_RATIO: f32 = 0.02;

pub const MIN_RATIO_OF_RATIOS: f32 = 0.2;
pub const MAX_RATIO_OF_RATIOS: f32 = 1.8;

/// SpO2 calibration polynomial `a·R² + b·R + c`, as `[a, b, c]`.
pub const SPO2_CALIBRATION: [f32; 3] = [-45.06, 30.354, 94.845];

pub const MIN_SPO2_PERCENT: f32 = 70.0;
pub const MAX_SPO2_PERCENT: f32 = 100.0;

/// Sensor ADC values are 18 bits wide.
pub const SAMPLE_MASK: u32 = 0x3_FFFF;
