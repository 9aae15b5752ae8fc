use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ppgvitals::config::MonitorConfig;
use ppgvitals::constants::{SAMPLE_RATE_HZ, WINDOW_SIZE};
use ppgvitals::monitor::spawn_sampling_task;
use ppgvitals::output::{OutputFormat, create_formatter};
use ppgvitals::sensor::WavFileSource;

#[derive(Parser, Debug)]
#[command(name = "ppgvitals")]
#[command(about = "Estimate heart rate and SpO2 from a RED/IR PPG recording", long_about = None)]
struct Args {
    /// Two-channel integer WAV recording (left = RED, right = IR)
    input: PathBuf,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Replay at the sensor's sample rate instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Do not report heart rate
    #[arg(long)]
    no_heart_rate: bool,

    /// Do not report SpO2
    #[arg(long)]
    no_spo2: bool,

    /// SpO2 output rate in Hz
    #[arg(long, default_value_t = 1.0)]
    spo2_rate: f32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
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

    let config = MonitorConfig {
        report_heart_rate: !args.no_heart_rate,
        report_spo2: !args.no_spo2,
        spo2_output_rate_hz: args.spo2_rate,
        realtime: args.realtime,
        ..Default::default()
    };
    config.validate().context("Invalid options")?;

    let source = WavFileSource::new(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    if args.verbose > 0 {
        eprintln!("=== ppgvitals ===");
        eprintln!("Input: {} ({} samples)", args.input.display(), source.len());
        eprintln!("Assumed sample rate: {} Hz", SAMPLE_RATE_HZ);
        eprintln!("Window: {} samples", WINDOW_SIZE);
        eprintln!();
    }

    let (tx, rx) = crossbeam_channel::bounded(config.channel_capacity);
    let task = spawn_sampling_task(Box::new(source), config, tx)?;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let mut readings = 0usize;
    for reading in rx.iter() {
        println!("{}", formatter.format(&reading));
        readings += 1;
    }

    let processed = task
        .join()
        .map_err(|_| anyhow::anyhow!("Sampling task panicked"))??;

    if readings == 0 {
        log::warn!("No readings from {} samples; check finger contact", processed);
    }

    Ok(())
}
