pub mod dc_removal;
pub mod math;
pub mod peak_detector;

pub use dc_removal::DcTracker;
pub use math::{polynomial, rms};
pub use peak_detector::PulseDetector;
