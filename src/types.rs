// src/types.rs
use crate::error::{DataFormatError, Result};
use std::fmt;

/// Identifier of a data-taking run
pub type RunNumber = u32;
/// Identifier assigned to each trigger decision
pub type TriggerNumber = u64;
/// Timing system timestamp (clock ticks)
pub type Timestamp = u64;
/// Signed difference between two timestamps
pub type TimestampDiff = i64;
/// Classification of the triggering condition
pub type TriggerType = u16;
/// Fragment payload type identifier
pub type FragmentType = u32;
/// Fragment size in bytes, header included
pub type FragmentSize = u64;

/// Sentinel values meaning "invalid/unset".
///
/// These are only used to initialise defaults; nothing in this crate treats
/// them specially when reading or writing a record.
pub struct TypeDefaults;

impl TypeDefaults {
    pub const INVALID_RUN_NUMBER: RunNumber = RunNumber::MAX;
    pub const INVALID_TRIGGER_NUMBER: TriggerNumber = TriggerNumber::MAX;
    pub const INVALID_TIMESTAMP: Timestamp = Timestamp::MAX;
    pub const INVALID_TIMESTAMP_DIFF: TimestampDiff = TimestampDiff::MAX;
    pub const INVALID_TRIGGER_TYPE: TriggerType = TriggerType::MAX;
    pub const INVALID_FRAGMENT_TYPE: FragmentType = FragmentType::MAX;
    pub const INVALID_FRAGMENT_SIZE: FragmentSize = FragmentSize::MAX;
}

/// Fixed-width set of 32 error/status flags.
///
/// Bit meanings belong to the producer of the record; this type only stores
/// them. Indices outside `0..32` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorBits(u32);

impl ErrorBits {
    pub const WIDTH: usize = 32;

    pub fn new(bits: u32) -> Self {
        ErrorBits(bits)
    }

    pub fn empty() -> Self {
        ErrorBits(0)
    }

    pub fn get(&self, bit: usize) -> Result<bool> {
        Self::check_bit(bit)?;
        Ok(self.0 & (1 << bit) != 0)
    }

    pub fn set(&mut self, bit: usize, value: bool) -> Result<()> {
        Self::check_bit(bit)?;
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
        Ok(())
    }

    /// Number of bits currently set
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn raw_value(&self) -> u32 {
        self.0
    }

    fn check_bit(bit: usize) -> Result<()> {
        if bit >= Self::WIDTH {
            Err(DataFormatError::IndexOutOfRange {
                index: bit,
                count: Self::WIDTH as u64,
            })
        } else {
            Ok(())
        }
    }
}

impl From<u32> for ErrorBits {
    fn from(bits: u32) -> Self {
        ErrorBits(bits)
    }
}

impl From<ErrorBits> for u32 {
    fn from(bits: ErrorBits) -> Self {
        bits.0
    }
}

impl fmt::Display for ErrorBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_bit() {
        let mut bits = ErrorBits::empty();
        assert!(!bits.get(3).unwrap());

        bits.set(3, true).unwrap();
        assert!(bits.get(3).unwrap());
        assert_eq!(bits.raw_value(), 0b1000);

        bits.set(31, true).unwrap();
        assert!(bits.get(31).unwrap());
        assert_eq!(bits.count_ones(), 2);

        bits.set(3, false).unwrap();
        assert!(!bits.get(3).unwrap());
        assert!(bits.get(31).unwrap());
    }

    #[test]
    fn test_out_of_range_bit() {
        let mut bits = ErrorBits::new(0xFFFF_FFFF);

        match bits.get(32) {
            Err(DataFormatError::IndexOutOfRange { index, count }) => {
                assert_eq!(index, 32);
                assert_eq!(count, 32);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }

        assert!(bits.set(100, false).is_err());
        assert_eq!(bits.raw_value(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_display_is_binary() {
        let bits = ErrorBits::new(0b101);
        let text = bits.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.ends_with("101"));
    }

    #[test]
    fn test_sentinels_are_max_values() {
        assert_eq!(TypeDefaults::INVALID_RUN_NUMBER, u32::MAX);
        assert_eq!(TypeDefaults::INVALID_TRIGGER_NUMBER, u64::MAX);
        assert_eq!(TypeDefaults::INVALID_TIMESTAMP_DIFF, i64::MAX);
        assert_eq!(TypeDefaults::INVALID_TRIGGER_TYPE, u16::MAX);
    }
}
