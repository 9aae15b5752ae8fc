use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::config::MonitorConfig;
use crate::constants::SAMPLE_RATE_HZ;
use crate::error::{PpgError, Result};
use crate::output::VitalsReading;
use crate::ppg::PpgWindowProcessor;
use crate::sensor::{PpgSample, SampleSource};

/// Drives one processor from a stream of samples
///
/// Heart rate is checked on every sample, as the detector needs to see each
/// one. SpO2 is a whole-window estimate and is only evaluated every
/// [`MonitorConfig::spo2_interval_samples`] samples.
pub struct VitalsMonitor {
    processor: Box<PpgWindowProcessor>,
    report_heart_rate: bool,
    report_spo2: bool,
    spo2_interval: u64,
}

impl VitalsMonitor {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            processor: Box::new(PpgWindowProcessor::new()),
            report_heart_rate: config.report_heart_rate,
            report_spo2: config.report_spo2,
            spo2_interval: config.spo2_interval_samples(),
        })
    }

    /// Feed one sample; returns a reading if any estimate is available.
    pub fn process_sample(&mut self, sample: PpgSample) -> Option<VitalsReading> {
        self.processor.add_sample(sample.red, sample.ir);
        let sample_index = self.processor.sample_count();

        // The detector must run every sample even when rates are not reported
        let heart_rate = self.processor.compute_heart_rate();
        let heart_rate_bpm = match heart_rate {
            Ok(bpm) if self.report_heart_rate => Some(bpm),
            Ok(_) => None,
            Err(reason) => {
                log::trace!("No heart rate at {}: {}", sample_index, reason);
                None
            }
        };

        let spo2_percent = if self.report_spo2 && sample_index % self.spo2_interval == 0 {
            match self.processor.compute_spo2() {
                Ok(spo2) => Some(spo2),
                Err(reason) => {
                    log::debug!("No SpO2 at {}: {}", sample_index, reason);
                    None
                }
            }
        } else {
            None
        };

        if heart_rate_bpm.is_none() && spo2_percent.is_none() {
            return None;
        }

        Some(VitalsReading {
            sample_index,
            heart_rate_bpm,
            spo2_percent,
        })
    }

    pub fn processor(&self) -> &PpgWindowProcessor {
        &self.processor
    }
}

/// Start the sampling task on its own thread
///
/// The task owns the source and the processor, forwards readings to `tx` and
/// returns the number of samples processed. It stops when the source is
/// exhausted, the receiver is dropped, or more than
/// `max_consecutive_read_errors` reads fail in a row.
pub fn spawn_sampling_task(
    mut source: Box<dyn SampleSource>,
    config: MonitorConfig,
    tx: Sender<VitalsReading>,
) -> Result<JoinHandle<Result<u64>>> {
    let mut monitor = VitalsMonitor::new(&config)?;

    if source.sample_rate() as f32 != SAMPLE_RATE_HZ {
        log::warn!(
            "Source delivers {} Hz but estimates assume {} Hz",
            source.sample_rate(),
            SAMPLE_RATE_HZ
        );
    }

    let handle = thread::Builder::new()
        .name("ppg-sampling".to_string())
        .spawn(move || {
            let period = Duration::from_secs_f32(1.0 / SAMPLE_RATE_HZ);
            let mut next_deadline = Instant::now();
            let mut consecutive_errors = 0u32;
            let mut processed = 0u64;

            log::info!("Sampling task started");

            loop {
                let sample = match source.next_sample() {
                    Ok(Some(sample)) => {
                        consecutive_errors = 0;
                        sample
                    }
                    Ok(None) => break,
                    Err(e) => {
                        consecutive_errors += 1;
                        if consecutive_errors > config.max_consecutive_read_errors {
                            log::error!("Giving up after {} failed reads", consecutive_errors);
                            return Err(e);
                        }
                        log::warn!("Sample read failed: {}", e);
                        thread::sleep(Duration::from_millis(10));
                        continue;
                    }
                };

                log::trace!("RED={} IR={}", sample.red, sample.ir);
                processed += 1;

                if let Some(reading) = monitor.process_sample(sample) {
                    if let Some(bpm) = reading.heart_rate_bpm {
                        log::info!("Heart rate = {:.1} BPM", bpm);
                    }
                    if let Some(spo2) = reading.spo2_percent {
                        log::info!("SpO2 = {:.1} %", spo2);
                    }
                    if tx.send(reading).is_err() {
                        log::warn!("Reading receiver dropped");
                        break;
                    }
                }

                if config.realtime {
                    next_deadline += period;
                    let now = Instant::now();
                    if next_deadline > now {
                        thread::sleep(next_deadline - now);
                    } else {
                        next_deadline = now;
                    }
                }
            }

            log::info!("Sampling task finished after {} samples", processed);
            Ok(processed)
        })
        .map_err(|e| PpgError::SensorRead(format!("failed to start sampling task: {}", e)))?;

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::MemorySource;

    struct FlakySource {
        failures_left: u32,
        samples: MemorySource,
    }

    impl SampleSource for FlakySource {
        fn next_sample(&mut self) -> Result<Option<PpgSample>> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(PpgError::SensorRead("bus timeout".to_string()));
            }
            self.samples.next_sample()
        }

        fn sample_rate(&self) -> u32 {
            50
        }
    }

    fn flat(n: usize) -> Vec<PpgSample> {
        vec![PpgSample::new(40_000, 50_000); n]
    }

    #[test]
    fn test_flat_signal_yields_no_readings() {
        let mut monitor = VitalsMonitor::new(&MonitorConfig::default()).unwrap();
        for sample in flat(500) {
            assert!(monitor.process_sample(sample).is_none());
        }
        assert_eq!(monitor.processor().sample_count(), 500);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MonitorConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert!(VitalsMonitor::new(&config).is_err());
    }

    #[test]
    fn test_task_recovers_from_transient_errors() {
        let (tx, _rx) = crossbeam_channel::bounded(16);
        let source = FlakySource {
            failures_left: 3,
            samples: MemorySource::new(flat(120), 50),
        };
        let handle = spawn_sampling_task(Box::new(source), MonitorConfig::default(), tx).unwrap();
        assert_eq!(handle.join().unwrap().unwrap(), 120);
    }

    #[test]
    fn test_task_gives_up_on_persistent_errors() {
        let (tx, _rx) = crossbeam_channel::bounded(16);
        let source = FlakySource {
            failures_left: u32::MAX,
            samples: MemorySource::new(Vec::new(), 50),
        };
        let config = MonitorConfig {
            max_consecutive_read_errors: 2,
            ..Default::default()
        };
        let handle = spawn_sampling_task(Box::new(source), config, tx).unwrap();
        assert!(matches!(
            handle.join().unwrap(),
            Err(PpgError::SensorRead(_))
        ));
    }
}
