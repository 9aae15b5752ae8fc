mod noise;
mod signal;

pub use noise::{
    AdditiveNoiseConfig, BaselineWanderConfig, NoiseConfig, ac_power, apply_noise,
    generate_noisy_ppg_signal,
};
pub use signal::{
    DEFAULT_IR_AMPLITUDE, DEFAULT_IR_BASELINE, DEFAULT_RED_BASELINE, PulseWaveform,
    generate_flat_signal, generate_ppg_signal, to_adc,
};
