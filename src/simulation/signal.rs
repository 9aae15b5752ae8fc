use std::f32::consts::PI;

use crate::constants::SAMPLE_MASK;
use crate::sensor::PpgSample;

/// Synthetic two-channel pulse waveform
///
/// Each channel is a constant baseline with a sinusoidal pulse on top. Both
/// channels pulse in phase, so the ratio of their relative amplitudes is the
/// ratio of ratios the SpO2 estimator sees.
#[derive(Debug, Clone, Copy)]
pub struct PulseWaveform {
    pub heart_rate_bpm: f32,
    pub red_baseline: f32,
    pub red_amplitude: f32,
    pub ir_baseline: f32,
    pub ir_amplitude: f32,
}

pub const DEFAULT_RED_BASELINE: f32 = 40_000.0;
pub const DEFAULT_IR_BASELINE: f32 = 50_000.0;
pub const DEFAULT_IR_AMPLITUDE: f32 = 5_000.0;

impl PulseWaveform {
    /// Waveform at the given rate whose RED relative amplitude is `ratio`
    /// times the IR one.
    pub fn with_ratio(heart_rate_bpm: f32, ratio: f32) -> Self {
        let ir_relative = DEFAULT_IR_AMPLITUDE / DEFAULT_IR_BASELINE;
        Self {
            heart_rate_bpm,
            red_baseline: DEFAULT_RED_BASELINE,
            red_amplitude: DEFAULT_RED_BASELINE * ir_relative * ratio,
            ir_baseline: DEFAULT_IR_BASELINE,
            ir_amplitude: DEFAULT_IR_AMPLITUDE,
        }
    }

    /// Scale both pulse amplitudes, keeping the ratio.
    pub fn scaled(mut self, factor: f32) -> Self {
        self.red_amplitude *= factor;
        self.ir_amplitude *= factor;
        self
    }

    pub fn generate(&self, num_samples: usize, sample_rate: f32) -> Vec<PpgSample> {
        let omega = 2.0 * PI * self.heart_rate_bpm / 60.0;
        (0..num_samples)
            .map(|i| {
                let pulse = (omega * i as f32 / sample_rate).sin();
                PpgSample {
                    red: to_adc(self.red_baseline + self.red_amplitude * pulse),
                    ir: to_adc(self.ir_baseline + self.ir_amplitude * pulse),
                }
            })
            .collect()
    }
}

impl Default for PulseWaveform {
    fn default() -> Self {
        Self::with_ratio(60.0, 0.6)
    }
}

/// Round and clamp a level into the sensor's 18-bit range.
pub fn to_adc(level: f32) -> u32 {
    level.round().clamp(0.0, SAMPLE_MASK as f32) as u32
}

/// Generate `duration_secs` of synthetic PPG
pub fn generate_ppg_signal(
    duration_secs: f32,
    sample_rate: u32,
    waveform: &PulseWaveform,
) -> Vec<PpgSample> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    waveform.generate(num_samples, sample_rate as f32)
}

/// A sensor with nothing pulsing in front of it
pub fn generate_flat_signal(num_samples: usize, red: u32, ir: u32) -> Vec<PpgSample> {
    vec![PpgSample::new(red, ir); num_samples]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        let signal = generate_ppg_signal(2.0, 50, &PulseWaveform::default());
        assert_eq!(signal.len(), 100);
    }

    #[test]
    fn test_ratio_of_amplitudes() {
        let waveform = PulseWaveform::with_ratio(60.0, 0.5);
        let red_rel = waveform.red_amplitude / waveform.red_baseline;
        let ir_rel = waveform.ir_amplitude / waveform.ir_baseline;
        assert!((red_rel / ir_rel - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pulse_period() {
        // 60 BPM at 50 Hz repeats every 50 samples
        let signal = PulseWaveform::default().generate(150, 50.0);
        assert_eq!(signal[10], signal[60]);
        assert_eq!(signal[10], signal[110]);
        assert_eq!(signal[0], PpgSample::new(40_000, 50_000));
    }

    #[test]
    fn test_to_adc_clamps() {
        assert_eq!(to_adc(-5.0), 0);
        assert_eq!(to_adc(1e9), SAMPLE_MASK);
        assert_eq!(to_adc(10.4), 10);
    }
}
