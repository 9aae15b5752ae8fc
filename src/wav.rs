use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::sensor::PpgSample;

/// Write a recording as a two-channel 32-bit integer WAV (left = RED, right = IR).
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[PpgSample],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for sample in samples {
        // 18-bit values always fit in i32
        writer.write_sample(sample.red as i32)?;
        writer.write_sample(sample.ir as i32)?;
    }

    writer.finalize()?;
    Ok(())
}
