use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use ppgvitals::constants::SAMPLE_RATE_HZ;
use ppgvitals::sensor::{SampleSource, WavFileSource};
use ppgvitals::{NoReading, PpgWindowProcessor};

#[derive(Parser, Debug)]
#[command(name = "analyze_wav")]
#[command(about = "Summarize heart rate and SpO2 estimates over PPG recordings", long_about = None)]
struct Args {
    /// WAV recordings to analyze (left = RED, right = IR)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Swap RED and IR channels
    #[arg(short = 's', long)]
    swap_channels: bool,

    /// Seconds to skip at the start of each recording
    #[arg(long, default_value_t = 0.0)]
    skip_secs: f32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct RejectionCounts {
    implausible_period: usize,
    implausible_rate: usize,
    low_perfusion: usize,
    ratio_out_of_range: usize,
    spo2_out_of_range: usize,
    no_signal: usize,
}

impl RejectionCounts {
    fn record(&mut self, reason: NoReading) {
        match reason {
            NoReading::ImplausiblePeriod => self.implausible_period += 1,
            NoReading::ImplausibleRate => self.implausible_rate += 1,
            NoReading::LowPerfusion => self.low_perfusion += 1,
            NoReading::RatioOutOfRange => self.ratio_out_of_range += 1,
            NoReading::Spo2OutOfRange => self.spo2_out_of_range += 1,
            NoReading::NoSignal => self.no_signal += 1,
            NoReading::WindowNotFilled | NoReading::NoPeak | NoReading::FirstPeak => {}
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct FileAnalysis {
    filename: String,
    sample_rate: u32,
    sample_count: usize,
    pulses: usize,
    heart_rate: Option<StatsSummary>,
    spo2: Option<StatsSummary>,
    rejections: RejectionCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let skip_samples = (args.skip_secs.max(0.0) * SAMPLE_RATE_HZ) as usize;

    let results: Vec<FileAnalysis> = args
        .files
        .iter()
        .map(|path| analyze_file(path, args.swap_channels, skip_samples))
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn analyze_file(path: &Path, swap_channels: bool, skip_samples: usize) -> FileAnalysis {
    match analyze_file_impl(path, swap_channels, skip_samples) {
        Ok(analysis) => analysis,
        Err(e) => FileAnalysis {
            filename: display_name(path),
            sample_rate: 0,
            sample_count: 0,
            pulses: 0,
            heart_rate: None,
            spo2: None,
            rejections: RejectionCounts::default(),
            error: Some(e.to_string()),
        },
    }
}

fn analyze_file_impl(
    path: &Path,
    swap_channels: bool,
    skip_samples: usize,
) -> anyhow::Result<FileAnalysis> {
    let mut source = WavFileSource::new(path)?;
    let sample_rate = source.sample_rate();
    if sample_rate as f32 != SAMPLE_RATE_HZ {
        log::warn!(
            "{}: recorded at {} Hz, estimates assume {} Hz",
            path.display(),
            sample_rate,
            SAMPLE_RATE_HZ
        );
    }

    let mut processor = PpgWindowProcessor::new();
    let mut hr_stats: Stats<f32> = Stats::new();
    let mut spo2_stats: Stats<f32> = Stats::new();
    let mut rejections = RejectionCounts::default();
    let mut pulses = 0usize;
    let mut last_peak = None;
    let mut sample_count = 0usize;

    while let Some(sample) = source.next_sample()? {
        let (red, ir) = if swap_channels {
            (sample.ir, sample.red)
        } else {
            (sample.red, sample.ir)
        };
        processor.add_sample(red, ir);
        sample_count += 1;

        let heart_rate = processor.compute_heart_rate();
        if processor.last_peak_index() != last_peak {
            last_peak = processor.last_peak_index();
            pulses += 1;
        }

        if sample_count <= skip_samples {
            continue;
        }

        match heart_rate {
            Ok(bpm) => hr_stats.update(bpm),
            Err(reason) => rejections.record(reason),
        }

        // One SpO2 estimate per second of recording
        if sample_count % SAMPLE_RATE_HZ as usize == 0 {
            match processor.compute_spo2() {
                Ok(spo2) => spo2_stats.update(spo2),
                Err(reason) => rejections.record(reason),
            }
        }
    }

    Ok(FileAnalysis {
        filename: display_name(path),
        sample_rate,
        sample_count,
        pulses,
        heart_rate: StatsSummary::from_stats(&hr_stats),
        spo2: StatsSummary::from_stats(&spo2_stats),
        rejections,
        error: None,
    })
}

fn format_summary(label: &str, unit: &str, summary: &Option<StatsSummary>) -> String {
    match summary {
        Some(s) => format!(
            "  {:<10} {:>6.1} {} (std {:.2}, range {:.1}-{:.1}, n={})",
            label, s.mean, unit, s.std_dev, s.min, s.max, s.count
        ),
        None => format!("  {:<10} no readings", label),
    }
}

fn print_text(results: &[FileAnalysis]) {
    for result in results {
        println!("{}", result.filename);
        if let Some(ref error) = result.error {
            println!("  error: {}", error);
            continue;
        }
        println!(
            "  {} samples at {} Hz ({:.1}s), {} pulses",
            result.sample_count,
            result.sample_rate,
            result.sample_count as f32 / SAMPLE_RATE_HZ,
            result.pulses
        );
        println!("{}", format_summary("Heart rate", "BPM", &result.heart_rate));
        println!("{}", format_summary("SpO2", "%", &result.spo2));
        let r = &result.rejections;
        println!(
            "  Rejected: period {}, rate {}, perfusion {}, ratio {}, spo2 {}, no signal {}",
            r.implausible_period,
            r.implausible_rate,
            r.low_perfusion,
            r.ratio_out_of_range,
            r.spo2_out_of_range,
            r.no_signal
        );
    }
}

fn csv_stats(summary: &Option<StatsSummary>) -> String {
    match summary {
        Some(s) => format!("{},{:.2},{:.3},{:.2},{:.2}", s.count, s.mean, s.std_dev, s.min, s.max),
        None => ",,,,".to_string(),
    }
}

fn print_csv(results: &[FileAnalysis]) {
    println!(
        "file,samples,pulses,hr_n,hr_mean,hr_std,hr_min,hr_max,spo2_n,spo2_mean,spo2_std,spo2_min,spo2_max,error"
    );
    for result in results {
        println!(
            "{},{},{},{},{},{}",
            result.filename,
            result.sample_count,
            result.pulses,
            csv_stats(&result.heart_rate),
            csv_stats(&result.spo2),
            result.error.as_deref().unwrap_or("")
        );
    }
}

fn print_json(results: &[FileAnalysis]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_counts_ignore_routine_outcomes() {
        let mut counts = RejectionCounts::default();
        counts.record(NoReading::NoPeak);
        counts.record(NoReading::FirstPeak);
        counts.record(NoReading::WindowNotFilled);
        counts.record(NoReading::LowPerfusion);
        counts.record(NoReading::ImplausiblePeriod);
        assert_eq!(counts.low_perfusion, 1);
        assert_eq!(counts.implausible_period, 1);
        assert_eq!(counts.no_signal, 0);
    }

    #[test]
    fn test_summary_requires_samples() {
        let stats: Stats<f32> = Stats::new();
        assert!(StatsSummary::from_stats(&stats).is_none());
    }
}
