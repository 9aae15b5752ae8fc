pub mod config;
pub mod constants;
pub mod error;
pub mod monitor;
pub mod output;
pub mod ppg;
pub mod sensor;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::MonitorConfig;
pub use error::{NoReading, PpgError, Result};
pub use ppg::PpgWindowProcessor;
pub use sensor::PpgSample;
pub use wav::save_wav;
