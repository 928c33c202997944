// src/trigger/header_data.rs
use crate::flat::RecordHeader;
use crate::types::{RunNumber, Timestamp, TriggerNumber, TriggerType, TypeDefaults};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Fixed header of a trigger record header buffer.
///
/// Layout (native endianness, 48 bytes):
///
/// ```text
/// 0   u32 trigger_record_header_marker
/// 4   u32 version
/// 8   u64 trigger_number
/// 16  u64 trigger_timestamp
/// 24  u64 num_requested_components
/// 32  u32 run_number
/// 36  u32 error_bits
/// 40  u16 trigger_type
/// 42  6 bytes padding
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct TriggerRecordHeaderData {
    pub trigger_record_header_marker: u32,
    pub version: u32,
    pub trigger_number: TriggerNumber,
    pub trigger_timestamp: Timestamp,
    /// Number of `ComponentRequest`s that follow the header
    pub num_requested_components: u64,
    pub run_number: RunNumber,
    pub error_bits: u32,
    pub trigger_type: TriggerType,
    pub unused: [u8; 6],
}

impl TriggerRecordHeaderData {
    pub const MAGIC: u32 = 0x3333_4444;
    pub const VERSION: u32 = 1;
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl Default for TriggerRecordHeaderData {
    fn default() -> Self {
        TriggerRecordHeaderData {
            trigger_record_header_marker: Self::MAGIC,
            version: Self::VERSION,
            trigger_number: TypeDefaults::INVALID_TRIGGER_NUMBER,
            trigger_timestamp: TypeDefaults::INVALID_TIMESTAMP,
            num_requested_components: 0,
            run_number: TypeDefaults::INVALID_RUN_NUMBER,
            error_bits: 0,
            trigger_type: TypeDefaults::INVALID_TRIGGER_TYPE,
            unused: [0; 6],
        }
    }
}

impl RecordHeader for TriggerRecordHeaderData {
    const MARKER: u32 = Self::MAGIC;
    const NAME: &'static str = "trigger_record_header";

    fn marker(&self) -> u32 {
        self.trigger_record_header_marker
    }

    fn element_count(&self) -> u64 {
        self.num_requested_components
    }

    fn set_element_count(&mut self, count: u64) {
        self.num_requested_components = count;
    }
}

impl fmt::Display for TriggerRecordHeaderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "check_word: {:x}, version: {}, trigger_number: {}, run_number: {}, \
             trigger_timestamp: {}, trigger_type: {}, error_bits: {}, num_requested_components: {}",
            self.trigger_record_header_marker,
            self.version,
            self.trigger_number,
            self.run_number,
            self.trigger_timestamp,
            self.trigger_type,
            self.error_bits,
            self.num_requested_components,
        )
    }
}
