use crate::constants::SAMPLE_MASK;
use crate::error::{PpgError, Result};

/// Number of bytes in one RED + IR FIFO record
pub const FIFO_RECORD_LEN: usize = 6;

/// One synchronously sampled RED/IR intensity pair
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PpgSample {
    pub red: u32,
    pub ir: u32,
}

impl PpgSample {
    pub fn new(red: u32, ir: u32) -> Self {
        Self { red, ir }
    }

    /// Decode one FIFO record as read from the sensor's data register.
    ///
    /// Each channel is three big-endian bytes of which only the low 18 bits
    /// are significant; RED comes first, then IR.
    pub fn from_fifo_record(record: &[u8; FIFO_RECORD_LEN]) -> Self {
        let channel = |b: &[u8]| {
            ((u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2])) & SAMPLE_MASK
        };
        Self {
            red: channel(&record[0..3]),
            ir: channel(&record[3..6]),
        }
    }

    /// Build a sample from signed recording values, rejecting anything that
    /// does not fit the sensor's 18-bit range.
    pub fn from_recorded(red: i64, ir: i64) -> Result<Self> {
        let check = |v: i64| {
            u32::try_from(v)
                .ok()
                .filter(|&v| v <= SAMPLE_MASK)
                .ok_or(PpgError::SampleRange(v))
        };
        Ok(Self {
            red: check(red)?,
            ir: check(ir)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fifo_record() {
        let record = [0x01, 0x23, 0x45, 0x00, 0xC3, 0x50];
        let sample = PpgSample::from_fifo_record(&record);
        assert_eq!(sample.red, 0x1_2345);
        assert_eq!(sample.ir, 50_000);
    }

    #[test]
    fn test_decode_masks_unused_bits() {
        let record = [0xFF, 0xFF, 0xFF, 0xFC, 0x00, 0x01];
        let sample = PpgSample::from_fifo_record(&record);
        assert_eq!(sample.red, SAMPLE_MASK);
        assert_eq!(sample.ir, 1);
    }

    #[test]
    fn test_from_recorded_range() {
        assert_eq!(
            PpgSample::from_recorded(40_000, 50_000).unwrap(),
            PpgSample::new(40_000, 50_000)
        );
        assert!(matches!(
            PpgSample::from_recorded(-1, 50_000),
            Err(PpgError::SampleRange(-1))
        ));
        assert!(PpgSample::from_recorded(0, 0x4_0000).is_err());
    }
}
