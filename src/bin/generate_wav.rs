use anyhow::{Context, Result};
use clap::Parser;
use ppgvitals::constants::SAMPLE_RATE_HZ;
use ppgvitals::save_wav;
use ppgvitals::simulation::{
    AdditiveNoiseConfig, BaselineWanderConfig, NoiseConfig, PulseWaveform,
    generate_noisy_ppg_signal,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic RED/IR PPG recordings for testing")]
struct Args {
    /// TOML noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Heart rates in BPM: comma-separated (e.g., "50,60,90") or range (e.g., "40-180:20")
    #[arg(short = 'r', long, default_value = "40-180:20")]
    rates: String,

    /// Ratio of ratios of the synthetic pulse (RED relative / IR relative)
    #[arg(long, default_value_t = 0.6)]
    ratio: f32,

    /// Pulse amplitude scale (1.0 = 10% of IR baseline)
    #[arg(long, default_value_t = 1.0)]
    amplitude: f32,

    /// Number of trials per rate
    #[arg(short, long, default_value_t = 3)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Recording duration in seconds
    #[arg(short, long, default_value_t = 30.0)]
    duration: f32,

    /// Output filename prefix
    #[arg(long, default_value = "ppg")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// AWGN SNR in dB against the pulse power (CLI override)
    #[arg(long)]
    snr: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    awgn: Option<AwgnSection>,
    wander: Option<WanderSection>,
}

#[derive(Debug, Deserialize)]
struct AwgnSection {
    snr_db: f32,
}

#[derive(Debug, Deserialize)]
struct WanderSection {
    relative_amplitude: f32,
    frequency_hz: f32,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    heart_rate_bpm: f32,
    trial: u32,
    seed: u64,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: u32,
    ratio: f32,
    duration: f32,
    files: Vec<ManifestEntry>,
}

fn parse_rates(s: &str) -> Result<Vec<f32>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f32 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f32 = range_parts[0].parse().context("Invalid start value")?;
        let end: f32 = range_parts[1].parse().context("Invalid end value")?;

        let mut rates = Vec::new();
        let mut r = start;
        while r <= end {
            rates.push(r);
            r += step;
        }
        Ok(rates)
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f32>().context("Invalid rate value"))
            .collect()
    }
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_noise_config(toml: &TomlConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = NoiseConfig::default().with_seed(seed);

    if let Some(snr) = args.snr {
        config.additive = Some(AdditiveNoiseConfig { snr_db: snr });
    } else if let Some(ref awgn) = toml.awgn {
        config.additive = Some(AdditiveNoiseConfig {
            snr_db: awgn.snr_db,
        });
    }

    if let Some(ref wander) = toml.wander {
        config.baseline_wander = Some(BaselineWanderConfig {
            relative_amplitude: wander.relative_amplitude,
            frequency_hz: wander.frequency_hz,
        });
    }

    config
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let rates = parse_rates(&args.rates)?;
    let base_seed = args.seed.unwrap_or(0);
    let sample_rate = SAMPLE_RATE_HZ as u32;

    let mut manifest_entries = Vec::new();
    let total_files = rates.len() * args.trials as usize;
    let mut file_count = 0;

    for &rate in &rates {
        let waveform = PulseWaveform::with_ratio(rate, args.ratio).scaled(args.amplitude);

        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + rate as u64;
            let noise_config = build_noise_config(&toml_config, &args, seed);

            let signal =
                generate_noisy_ppg_signal(args.duration, sample_rate, &waveform, &noise_config);

            let filename = format!("{}_hr{:03}_t{:02}.wav", args.prefix, rate as i32, trial);
            let filepath = args.output_dir.join(&filename);

            save_wav(&filepath, &signal, sample_rate).context("Failed to write WAV file")?;

            manifest_entries.push(ManifestEntry {
                file: filename,
                heart_rate_bpm: rate,
                trial,
                seed,
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate,
            ratio: args.ratio,
            duration: args.duration,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates_comma_separated() {
        let rates = parse_rates("50,60,90").unwrap();
        assert_eq!(rates, vec![50.0, 60.0, 90.0]);
    }

    #[test]
    fn test_parse_rates_range() {
        let rates = parse_rates("40-100:20").unwrap();
        assert_eq!(rates, vec![40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_parse_rates_rejects_zero_step() {
        assert!(parse_rates("40-100:0").is_err());
    }

    #[test]
    fn test_toml_noise_sections() {
        let toml: TomlConfig = toml::from_str(
            r#"
            [awgn]
            snr_db = 25.0

            [wander]
            relative_amplitude = 0.01
            frequency_hz = 0.25
            "#,
        )
        .unwrap();
        let args = Args::parse_from(["generate_wav"]);
        let config = build_noise_config(&toml, &args, 9);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.additive.map(|a| a.snr_db), Some(25.0));
        assert!(config.baseline_wander.is_some());
    }
}
