//! Ratio-of-ratios SpO2 estimation.
//!
//! The calibration polynomial and plausibility bounds are fixed data, see
//! [`crate::constants`].

use crate::constants::{
    MAX_RATIO_OF_RATIOS, MAX_SPO2_PERCENT, MIN_DC_LEVEL, MIN_PERFUSION_RATIO,
    MIN_RATIO_OF_RATIOS, MIN_SPO2_PERCENT, SPO2_CALIBRATION,
};
use crate::error::NoReading;
use crate::signal_processing::polynomial;

/// AC RMS and DC baseline of one channel over the analysis window.
#[derive(Debug, Clone, Copy)]
pub struct ChannelLevels {
    pub ac_rms: f32,
    pub dc: f32,
}

impl ChannelLevels {
    /// Relative pulsatile amplitude (perfusion), `None` without signal.
    pub fn perfusion(&self) -> Option<f32> {
        (self.dc >= MIN_DC_LEVEL).then(|| self.ac_rms / self.dc)
    }
}

/// Ratio of the RED and IR relative amplitudes.
pub fn ratio_of_ratios(rel_red: f32, rel_ir: f32) -> Result<f32, NoReading> {
    if rel_red < MIN_PERFUSION_RATIO || rel_ir < MIN_PERFUSION_RATIO {
        return Err(NoReading::LowPerfusion);
    }

    let r = rel_red / rel_ir;
    if !(MIN_RATIO_OF_RATIOS..=MAX_RATIO_OF_RATIOS).contains(&r) {
        return Err(NoReading::RatioOutOfRange);
    }
    Ok(r)
}

/// Map a ratio of ratios to a saturation percentage.
pub fn calibrate(r: f32) -> Result<f32, NoReading> {
    let spo2 = polynomial(&SPO2_CALIBRATION, r);
    if !(MIN_SPO2_PERCENT..=MAX_SPO2_PERCENT).contains(&spo2) {
        return Err(NoReading::Spo2OutOfRange);
    }
    Ok(spo2)
}

/// Full estimate from the window levels of both channels.
pub fn estimate(red: ChannelLevels, ir: ChannelLevels) -> Result<f32, NoReading> {
    let (Some(rel_red), Some(rel_ir)) = (red.perfusion(), ir.perfusion()) else {
        return Err(NoReading::NoSignal);
    };
    calibrate(ratio_of_ratios(rel_red, rel_ir)?)
}
