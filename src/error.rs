use thiserror::Error;

/// Failures of the collaborators around the processor: sample sources,
/// recordings and configuration.
#[derive(Error, Debug)]
pub enum PpgError {
    #[error("Sensor read failed: {0}")]
    SensorRead(String),

    #[error("Recording format error: {0}")]
    RecordingFormat(String),

    #[error("Sample value {0} outside the 18-bit sensor range")]
    SampleRange(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, PpgError>;

/// Why an estimate is not available this cycle.
///
/// None of these are faults; callers should treat every variant as
/// "no reading" and keep feeding samples.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoReading {
    #[error("window not yet filled")]
    WindowNotFilled,

    #[error("no signal on sensor")]
    NoSignal,

    #[error("no pulse detected this cycle")]
    NoPeak,

    #[error("waiting for a second pulse")]
    FirstPeak,

    #[error("beat period outside plausible range")]
    ImplausiblePeriod,

    #[error("heart rate outside plausible range")]
    ImplausibleRate,

    #[error("pulsatile amplitude too low")]
    LowPerfusion,

    #[error("ratio of ratios outside calibration range")]
    RatioOutOfRange,

    #[error("SpO2 outside plausible range")]
    Spo2OutOfRange,
}
