pub mod heart_rate;
pub mod processor;
pub mod spo2;
pub mod window;

pub use heart_rate::HeartRateEstimator;
pub use processor::PpgWindowProcessor;
pub use spo2::ChannelLevels;
pub use window::{SampleWindow, WindowEntry};
