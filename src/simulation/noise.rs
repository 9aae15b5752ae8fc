use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::PI;

use super::signal::{PulseWaveform, to_adc};
use crate::sensor::PpgSample;

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub baseline_wander: Option<BaselineWanderConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f32) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_baseline_wander(mut self, relative_amplitude: f32, frequency_hz: f32) -> Self {
        self.baseline_wander = Some(BaselineWanderConfig {
            relative_amplitude,
            frequency_hz,
        });
        self
    }
}

/// White Gaussian noise at an SNR measured against the pulsatile (AC) power
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f32,
}

/// Slow sinusoidal drift of the baseline, e.g. from respiration
#[derive(Clone, Debug, serde::Deserialize)]
pub struct BaselineWanderConfig {
    /// Peak drift as a fraction of the channel mean
    pub relative_amplitude: f32,
    pub frequency_hz: f32,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Mean power of the signal around its mean
pub fn ac_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let mean = signal.iter().sum::<f32>() / signal.len() as f32;
    signal.iter().map(|&x| (x - mean) * (x - mean)).sum::<f32>() / signal.len() as f32
}

fn apply_additive_noise(signal: &mut [f32], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let sig_power = ac_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f32.powf(config.snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();

    let Ok(normal) = Normal::new(0.0, noise_std as f64) else {
        return;
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng) as f32;
    }
}

fn apply_baseline_wander(
    signal: &mut [f32],
    config: &BaselineWanderConfig,
    sample_rate: f32,
    rng: &mut ChaCha8Rng,
) {
    if signal.is_empty() {
        return;
    }
    let mean = signal.iter().sum::<f32>() / signal.len() as f32;
    let amplitude = mean * config.relative_amplitude;
    let phase: f32 = rng.random::<f32>() * 2.0 * PI;
    let omega = 2.0 * PI * config.frequency_hz / sample_rate;

    for (i, sample) in signal.iter_mut().enumerate() {
        *sample += amplitude * (omega * i as f32 + phase).sin();
    }
}

fn apply_channel(signal: &mut [f32], config: &NoiseConfig, sample_rate: f32, rng: &mut ChaCha8Rng) {
    if let Some(ref wander) = config.baseline_wander {
        apply_baseline_wander(signal, wander, sample_rate, rng);
    }
    if let Some(ref additive) = config.additive {
        apply_additive_noise(signal, additive, rng);
    }
}

/// Apply the configured impairments to both channels independently
pub fn apply_noise(samples: &[PpgSample], config: &NoiseConfig, sample_rate: f32) -> Vec<PpgSample> {
    let mut rng = create_rng(config.seed);

    let mut red: Vec<f32> = samples.iter().map(|s| s.red as f32).collect();
    let mut ir: Vec<f32> = samples.iter().map(|s| s.ir as f32).collect();

    apply_channel(&mut red, config, sample_rate, &mut rng);
    apply_channel(&mut ir, config, sample_rate, &mut rng);

    red.iter()
        .zip(ir.iter())
        .map(|(&r, &i)| PpgSample::new(to_adc(r), to_adc(i)))
        .collect()
}

pub fn generate_noisy_ppg_signal(
    duration_secs: f32,
    sample_rate: u32,
    waveform: &PulseWaveform,
    config: &NoiseConfig,
) -> Vec<PpgSample> {
    let clean = super::signal::generate_ppg_signal(duration_secs, sample_rate, waveform);
    apply_noise(&clean, config, sample_rate as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ir_channel(samples: &[PpgSample]) -> Vec<f32> {
        samples.iter().map(|s| s.ir as f32).collect()
    }

    #[test]
    fn test_noise_is_reproducible_with_seed() {
        let config = NoiseConfig::default().with_seed(7).with_awgn(20.0);
        let a = generate_noisy_ppg_signal(2.0, 50, &PulseWaveform::default(), &config);
        let b = generate_noisy_ppg_signal(2.0, 50, &PulseWaveform::default(), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_awgn_snr() {
        let waveform = PulseWaveform::default();
        let clean = generate_ppg_signal_for_test(&waveform);
        let config = NoiseConfig::default().with_seed(1).with_awgn(10.0);
        let noisy = apply_noise(&clean, &config, 50.0);

        let clean_ir = ir_channel(&clean);
        let noise: Vec<f32> = ir_channel(&noisy)
            .iter()
            .zip(clean_ir.iter())
            .map(|(n, c)| n - c)
            .collect();

        let snr = 10.0 * (ac_power(&clean_ir) / ac_power(&noise)).log10();
        assert!((snr - 10.0).abs() < 1.0, "Measured SNR {} dB", snr);
    }

    #[test]
    fn test_no_impairments_is_identity() {
        let clean = generate_ppg_signal_for_test(&PulseWaveform::default());
        let noisy = apply_noise(&clean, &NoiseConfig::default().with_seed(3), 50.0);
        assert_eq!(clean, noisy);
    }

    #[test]
    fn test_baseline_wander_shifts_levels() {
        let flat = super::super::signal::generate_flat_signal(500, 40_000, 50_000);
        let config = NoiseConfig::default()
            .with_seed(5)
            .with_baseline_wander(0.05, 0.25);
        let wandered = apply_noise(&flat, &config, 50.0);

        let ir = ir_channel(&wandered);
        let max = ir.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min = ir.iter().cloned().fold(f32::INFINITY, f32::min);
        // 500 samples at 50 Hz cover 2.5 wander cycles
        assert!(max - min > 4_000.0, "Wander span {}", max - min);
    }

    fn generate_ppg_signal_for_test(waveform: &PulseWaveform) -> Vec<PpgSample> {
        super::super::signal::generate_ppg_signal(10.0, 50, waveform)
    }
}
