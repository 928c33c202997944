// src/fragment/record.rs
use super::header::FragmentHeader;
use crate::component::GeoID;
use crate::error::Result;
use crate::flat::FlatRecord;
use crate::types::{
    ErrorBits, FragmentSize, FragmentType, RunNumber, Timestamp, TimestampDiff, TriggerNumber,
};
use std::mem::offset_of;

/// Flat buffer holding a [`FragmentHeader`] followed by the raw payload
/// read out from one link.
pub type Fragment<'a> = FlatRecord<'a, FragmentHeader, u8>;

const SIZE: usize = offset_of!(FragmentHeader, size);
const TRIGGER_NUMBER: usize = offset_of!(FragmentHeader, trigger_number);
const TRIGGER_TIMESTAMP: usize = offset_of!(FragmentHeader, trigger_timestamp);
const WINDOW_OFFSET: usize = offset_of!(FragmentHeader, window_offset);
const WINDOW_WIDTH: usize = offset_of!(FragmentHeader, window_width);
const RUN_NUMBER: usize = offset_of!(FragmentHeader, run_number);
const LINK_ID: usize = offset_of!(FragmentHeader, link_id);
const ERROR_BITS: usize = offset_of!(FragmentHeader, error_bits);
const FRAGMENT_TYPE: usize = offset_of!(FragmentHeader, fragment_type);

impl<'a> FlatRecord<'a, FragmentHeader, u8> {
    /// Copy `payload` into a new fragment with default header fields
    pub fn new(payload: &[u8]) -> Result<Self> {
        Self::from_elements(FragmentHeader::default(), payload)
    }

    /// Build a fragment whose payload is the concatenation of `pieces`.
    ///
    /// `header.size` is replaced by the real total size.
    pub fn from_pieces(header: FragmentHeader, pieces: &[&[u8]]) -> Result<Self> {
        Self::from_element_chunks(header, pieces)
    }

    pub fn get_header(&self) -> FragmentHeader {
        self.header()
    }

    /// Copy every header field except marker, version and size
    pub fn set_header_fields(&mut self, header: &FragmentHeader) -> Result<()> {
        self.update_header(|current| {
            current.trigger_number = header.trigger_number;
            current.trigger_timestamp = header.trigger_timestamp;
            current.window_offset = header.window_offset;
            current.window_width = header.window_width;
            current.run_number = header.run_number;
            current.link_id = header.link_id;
            current.error_bits = header.error_bits;
            current.fragment_type = header.fragment_type;
        })
    }

    pub fn trigger_number(&self) -> TriggerNumber {
        self.read_field(TRIGGER_NUMBER)
    }

    pub fn set_trigger_number(&mut self, trigger_number: TriggerNumber) -> Result<()> {
        self.write_field(TRIGGER_NUMBER, trigger_number)
    }

    pub fn run_number(&self) -> RunNumber {
        self.read_field(RUN_NUMBER)
    }

    pub fn set_run_number(&mut self, run_number: RunNumber) -> Result<()> {
        self.write_field(RUN_NUMBER, run_number)
    }

    pub fn trigger_timestamp(&self) -> Timestamp {
        self.read_field(TRIGGER_TIMESTAMP)
    }

    pub fn set_trigger_timestamp(&mut self, trigger_timestamp: Timestamp) -> Result<()> {
        self.write_field(TRIGGER_TIMESTAMP, trigger_timestamp)
    }

    pub fn window_offset(&self) -> TimestampDiff {
        self.read_field(WINDOW_OFFSET)
    }

    pub fn set_window_offset(&mut self, window_offset: TimestampDiff) -> Result<()> {
        self.write_field(WINDOW_OFFSET, window_offset)
    }

    pub fn window_width(&self) -> TimestampDiff {
        self.read_field(WINDOW_WIDTH)
    }

    pub fn set_window_width(&mut self, window_width: TimestampDiff) -> Result<()> {
        self.write_field(WINDOW_WIDTH, window_width)
    }

    pub fn link_id(&self) -> GeoID {
        self.read_field(LINK_ID)
    }

    pub fn set_link_id(&mut self, link_id: GeoID) -> Result<()> {
        self.write_field(LINK_ID, link_id)
    }

    pub fn error_bits(&self) -> ErrorBits {
        ErrorBits::new(self.read_field(ERROR_BITS))
    }

    pub fn set_error_bits(&mut self, bits: ErrorBits) -> Result<()> {
        self.write_field(ERROR_BITS, bits.raw_value())
    }

    pub fn error_bit(&self, bit: usize) -> Result<bool> {
        self.error_bits().get(bit)
    }

    pub fn set_error_bit(&mut self, bit: usize, value: bool) -> Result<()> {
        let mut bits = self.error_bits();
        bits.set(bit, value)?;
        self.set_error_bits(bits)
    }

    pub fn fragment_type(&self) -> FragmentType {
        self.read_field(FRAGMENT_TYPE)
    }

    pub fn set_fragment_type(&mut self, fragment_type: FragmentType) -> Result<()> {
        self.write_field(FRAGMENT_TYPE, fragment_type)
    }

    /// Total fragment size in bytes, header included
    pub fn size(&self) -> FragmentSize {
        self.read_field(SIZE)
    }

    /// Payload following the header
    pub fn data(&self) -> &[u8] {
        self.trailing_bytes()
    }

    pub fn data_mut(&mut self) -> Result<&mut [u8]> {
        self.trailing_bytes_mut()
    }
}

/// Fragments serialize as their raw byte image and deserialize by copying
/// that image into an owned buffer.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::Fragment;
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    // Upper bound on preallocation from an untrusted length hint
    const MAX_PREALLOCATION: usize = 1 << 20;

    impl Serialize for Fragment<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    struct FragmentVisitor;

    impl<'de> Visitor<'de> for FragmentVisitor {
        type Value = Fragment<'static>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("the byte image of a fragment")
        }

        fn visit_bytes<E: de::Error>(self, bytes: &[u8]) -> Result<Self::Value, E> {
            Fragment::copy_from(bytes).map_err(E::custom)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATION);
            let mut bytes = Vec::with_capacity(capacity);
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            self.visit_bytes(&bytes)
        }
    }

    impl<'de> Deserialize<'de> for Fragment<'static> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_bytes(FragmentVisitor)
        }
    }
}
