// src/fragment/header.rs
use crate::component::GeoID;
use crate::error::{DataFormatError, Result};
use crate::flat::RecordHeader;
use crate::types::{
    FragmentSize, FragmentType, RunNumber, Timestamp, TimestampDiff, TriggerNumber, TypeDefaults,
};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Fixed header at the start of every fragment buffer.
///
/// `size` counts the whole fragment, header included; the payload is the
/// `size - SIZE` bytes that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct FragmentHeader {
    pub fragment_header_marker: u32,
    pub version: u32,
    pub size: FragmentSize,
    pub trigger_number: TriggerNumber,
    pub trigger_timestamp: Timestamp,
    pub window_offset: TimestampDiff,
    pub window_width: TimestampDiff,
    pub run_number: RunNumber,
    /// Readout link that produced the payload
    pub link_id: GeoID,
    pub error_bits: u32,
    pub fragment_type: FragmentType,
    pub unused: u32,
}

impl FragmentHeader {
    pub const MAGIC: u32 = 0x1111_2222;
    pub const VERSION: u32 = 1;
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl Default for FragmentHeader {
    fn default() -> Self {
        FragmentHeader {
            fragment_header_marker: Self::MAGIC,
            version: Self::VERSION,
            size: TypeDefaults::INVALID_FRAGMENT_SIZE,
            trigger_number: TypeDefaults::INVALID_TRIGGER_NUMBER,
            trigger_timestamp: TypeDefaults::INVALID_TIMESTAMP,
            window_offset: TypeDefaults::INVALID_TIMESTAMP_DIFF,
            window_width: TypeDefaults::INVALID_TIMESTAMP_DIFF,
            run_number: TypeDefaults::INVALID_RUN_NUMBER,
            link_id: GeoID::default(),
            error_bits: 0,
            fragment_type: TypeDefaults::INVALID_FRAGMENT_TYPE,
            unused: 0,
        }
    }
}

impl RecordHeader for FragmentHeader {
    const MARKER: u32 = Self::MAGIC;
    const NAME: &'static str = "fragment";

    fn marker(&self) -> u32 {
        self.fragment_header_marker
    }

    fn element_count(&self) -> u64 {
        self.size.saturating_sub(Self::SIZE as u64)
    }

    fn set_element_count(&mut self, count: u64) {
        self.size = count.saturating_add(Self::SIZE as u64);
    }

    fn validate(&self) -> Result<()> {
        if self.size < Self::SIZE as u64 {
            return Err(DataFormatError::InvalidRecordSize {
                size: self.size,
                minimum: Self::SIZE,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FragmentHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "check_word: {:x}, version: {}, size: {}, trigger_number: {}, run_number: {}, \
             trigger_timestamp: {}, window_offset: {}, window_width: {}, link_id: {}, \
             error_bits: {}, fragment_type: {}",
            self.fragment_header_marker,
            self.version,
            self.size,
            self.trigger_number,
            self.run_number,
            self.trigger_timestamp,
            self.window_offset,
            self.window_width,
            self.link_id,
            self.error_bits,
            self.fragment_type,
        )
    }
}
