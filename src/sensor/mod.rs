pub mod sample;
pub mod source;

pub use sample::{FIFO_RECORD_LEN, PpgSample};
pub use source::{MemorySource, SampleSource, WavFileSource};
