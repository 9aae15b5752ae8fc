use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;

use super::PpgSample;
use crate::error::{PpgError, Result};

/// Pull interface to whatever delivers sensor samples
///
/// Returns `Ok(None)` once the source is exhausted. Errors are read
/// failures; a live sensor may recover from them on the next call.
pub trait SampleSource: Send {
    fn next_sample(&mut self) -> Result<Option<PpgSample>>;
    fn sample_rate(&self) -> u32;
}

/// Replays samples held in memory
pub struct MemorySource {
    samples: Vec<PpgSample>,
    position: usize,
    sample_rate: u32,
}

impl MemorySource {
    pub fn new(samples: Vec<PpgSample>, sample_rate: u32) -> Self {
        Self {
            samples,
            position: 0,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for MemorySource {
    fn next_sample(&mut self) -> Result<Option<PpgSample>> {
        let sample = self.samples.get(self.position).copied();
        if sample.is_some() {
            self.position += 1;
        }
        Ok(sample)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Reads a two-channel integer WAV recording (left = RED, right = IR)
pub struct WavFileSource {
    inner: MemorySource,
}

impl WavFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if spec.channels != 2 {
            return Err(PpgError::RecordingFormat(format!(
                "expected 2 channels (red, ir), got {}",
                spec.channels
            )));
        }
        if spec.sample_format != hound::SampleFormat::Int {
            return Err(PpgError::RecordingFormat(
                "expected integer samples".to_string(),
            ));
        }

        let samples = Self::read_samples(reader)?;
        log::info!(
            "Loaded {} samples at {} Hz from {}",
            samples.len(),
            spec.sample_rate,
            path.as_ref().display()
        );

        Ok(Self {
            inner: MemorySource::new(samples, spec.sample_rate),
        })
    }

    fn read_samples(mut reader: WavReader<BufReader<File>>) -> Result<Vec<PpgSample>> {
        let values = reader.samples::<i32>().collect::<std::result::Result<Vec<_>, _>>()?;
        values
            .chunks_exact(2)
            .map(|pair| PpgSample::from_recorded(i64::from(pair[0]), i64::from(pair[1])))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SampleSource for WavFileSource {
    fn next_sample(&mut self) -> Result<Option<PpgSample>> {
        self.inner.next_sample()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
}
