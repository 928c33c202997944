// src/trigger/record.rs
use super::header::TriggerRecordHeader;
use super::header_data::TriggerRecordHeaderData;
use crate::component::ComponentRequest;
use crate::error::{DataFormatError, Result};
use crate::fragment::{Fragment, FragmentHeader};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Write;
use tracing::debug;

/// A trigger record header together with the fragments collected for it.
///
/// Always owns its header and fragments. Records are moved, not copied.
#[derive(Debug)]
pub struct TriggerRecord {
    header: TriggerRecordHeader<'static>,
    fragments: Vec<Fragment<'static>>,
}

impl TriggerRecord {
    /// Create a record with a default header requesting `components` and no fragments
    pub fn new(components: &[ComponentRequest]) -> Result<Self> {
        Ok(TriggerRecord {
            header: TriggerRecordHeader::new(components)?,
            fragments: Vec::new(),
        })
    }

    /// Create a record from an existing header; borrowed headers are copied
    pub fn from_header(header: TriggerRecordHeader<'_>) -> Result<Self> {
        Ok(TriggerRecord {
            header: header.into_owned()?,
            fragments: Vec::new(),
        })
    }

    pub fn header(&self) -> &TriggerRecordHeader<'static> {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut TriggerRecordHeader<'static> {
        &mut self.header
    }

    pub fn header_data(&self) -> TriggerRecordHeaderData {
        self.header.get_header()
    }

    pub fn set_header(&mut self, header: TriggerRecordHeader<'_>) -> Result<()> {
        self.header = header.into_owned()?;
        Ok(())
    }

    pub fn fragments(&self) -> &[Fragment<'static>] {
        &self.fragments
    }

    pub fn fragments_mut(&mut self) -> &mut Vec<Fragment<'static>> {
        &mut self.fragments
    }

    pub fn set_fragments(&mut self, fragments: Vec<Fragment<'static>>) {
        self.fragments = fragments;
    }

    pub fn add_fragment(&mut self, fragment: Fragment<'static>) {
        self.fragments.push(fragment);
    }

    /// Header buffer plus every fragment buffer
    pub fn total_size_bytes(&self) -> usize {
        self.header.total_size_bytes()
            + self
                .fragments
                .iter()
                .map(|fragment| fragment.total_size_bytes())
                .sum::<usize>()
    }

    /// Serialize as the header buffer followed by each fragment buffer in order
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.total_size_bytes());
        buffer.put_slice(self.header.as_bytes());
        for fragment in &self.fragments {
            buffer.put_slice(fragment.as_bytes());
        }
        buffer.freeze()
    }

    /// Parse the layout produced by [`to_bytes`](Self::to_bytes).
    ///
    /// Fragments are read until the buffer is exhausted; a partial fragment
    /// at the end is reported as `TruncatedBuffer`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = TriggerRecordHeader::copy_from(bytes)?;
        let mut offset = header.total_size_bytes();
        let mut fragments = Vec::new();

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            if remaining.len() < FragmentHeader::SIZE {
                return Err(DataFormatError::TruncatedBuffer {
                    required: FragmentHeader::SIZE,
                    actual: remaining.len(),
                });
            }
            let fragment = Fragment::copy_from(remaining)?;
            offset += fragment.total_size_bytes();
            fragments.push(fragment);
        }

        debug!(
            trigger_number = header.trigger_number(),
            fragments = fragments.len(),
            size = offset,
            "parsed trigger record"
        );
        Ok(TriggerRecord { header, fragments })
    }

    /// Write the same bytes as [`to_bytes`](Self::to_bytes) to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header.write_to(writer)?;
        for fragment in &self.fragments {
            fragment.write_to(writer)?;
        }
        Ok(())
    }
}
