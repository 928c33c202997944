// src/trigger/header.rs
use super::header_data::TriggerRecordHeaderData;
use crate::component::ComponentRequest;
use crate::error::Result;
use crate::flat::FlatRecord;
use crate::types::{ErrorBits, RunNumber, Timestamp, TriggerNumber, TriggerType};
use std::mem::offset_of;

/// Flat buffer holding a [`TriggerRecordHeaderData`] followed by the
/// [`ComponentRequest`]s the trigger asked to read out.
///
/// Field setters return `Result` because a read-only view cannot be
/// written; on error the buffer is unchanged.
///
/// # Example
///
/// ```
/// use daq_dataformats::{ComponentRequest, GeoID, TriggerRecordHeader};
///
/// let components = vec![
///     ComponentRequest::new(GeoID::new(1, 0), 100, 200),
///     ComponentRequest::new(GeoID::new(1, 1), 100, 200),
/// ];
/// let mut header = TriggerRecordHeader::new(&components).unwrap();
/// header.set_trigger_number(42).unwrap();
/// header.set_error_bit(3, true).unwrap();
///
/// assert_eq!(header.num_requested_components(), 2);
/// assert_eq!(header.at(1).unwrap().component, GeoID::new(1, 1));
/// assert!(header.to_string().contains("trigger_number: 42"));
/// ```
pub type TriggerRecordHeader<'a> = FlatRecord<'a, TriggerRecordHeaderData, ComponentRequest>;

const TRIGGER_NUMBER: usize = offset_of!(TriggerRecordHeaderData, trigger_number);
const TRIGGER_TIMESTAMP: usize = offset_of!(TriggerRecordHeaderData, trigger_timestamp);
const RUN_NUMBER: usize = offset_of!(TriggerRecordHeaderData, run_number);
const ERROR_BITS: usize = offset_of!(TriggerRecordHeaderData, error_bits);
const TRIGGER_TYPE: usize = offset_of!(TriggerRecordHeaderData, trigger_type);

impl<'a> FlatRecord<'a, TriggerRecordHeaderData, ComponentRequest> {
    /// Build a header with default field values around `components`
    pub fn new(components: &[ComponentRequest]) -> Result<Self> {
        Self::from_elements(TriggerRecordHeaderData::default(), components)
    }

    /// Build from explicit header fields; `num_requested_components` is
    /// taken from `components.len()`
    pub fn with_header(header: TriggerRecordHeaderData, components: &[ComponentRequest]) -> Result<Self> {
        Self::from_elements(header, components)
    }

    pub fn get_header(&self) -> TriggerRecordHeaderData {
        self.header()
    }

    /// Copy the caller-settable fields of `header` into this record.
    ///
    /// Marker, version and component count are left alone.
    pub fn set_header_fields(&mut self, header: &TriggerRecordHeaderData) -> Result<()> {
        self.update_header(|current| {
            current.trigger_number = header.trigger_number;
            current.trigger_timestamp = header.trigger_timestamp;
            current.run_number = header.run_number;
            current.error_bits = header.error_bits;
            current.trigger_type = header.trigger_type;
        })
    }

    pub fn trigger_number(&self) -> TriggerNumber {
        self.read_field(TRIGGER_NUMBER)
    }

    pub fn set_trigger_number(&mut self, trigger_number: TriggerNumber) -> Result<()> {
        self.write_field(TRIGGER_NUMBER, trigger_number)
    }

    pub fn trigger_timestamp(&self) -> Timestamp {
        self.read_field(TRIGGER_TIMESTAMP)
    }

    pub fn set_trigger_timestamp(&mut self, trigger_timestamp: Timestamp) -> Result<()> {
        self.write_field(TRIGGER_TIMESTAMP, trigger_timestamp)
    }

    pub fn run_number(&self) -> RunNumber {
        self.read_field(RUN_NUMBER)
    }

    pub fn set_run_number(&mut self, run_number: RunNumber) -> Result<()> {
        self.write_field(RUN_NUMBER, run_number)
    }

    pub fn trigger_type(&self) -> TriggerType {
        self.read_field(TRIGGER_TYPE)
    }

    pub fn set_trigger_type(&mut self, trigger_type: TriggerType) -> Result<()> {
        self.write_field(TRIGGER_TYPE, trigger_type)
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

    /// Read-modify-write of a single error bit
    pub fn set_error_bit(&mut self, bit: usize, value: bool) -> Result<()> {
        let mut bits = self.error_bits();
        bits.set(bit, value)?;
        self.set_error_bits(bits)
    }

    pub fn num_requested_components(&self) -> u64 {
        self.element_count()
    }

    /// Copy of the component request at `idx`
    pub fn at(&self, idx: usize) -> Result<ComponentRequest> {
        self.element(idx)
    }

    pub fn at_mut(&mut self, idx: usize) -> Result<&mut ComponentRequest> {
        self.element_mut(idx)
    }

    pub fn set_component(&mut self, idx: usize, component: ComponentRequest) -> Result<()> {
        self.set_element(idx, component)
    }

    pub fn components(&self) -> impl Iterator<Item = ComponentRequest> + '_ {
        self.elements()
    }

    /// Start of the flat buffer, for zero-copy I/O
    pub fn storage_location(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::GeoID;
    use crate::error::DataFormatError;
    use crate::flat::BufferAdoptionMode;

    fn components(n: u32) -> Vec<ComponentRequest> {
        (0..n)
            .map(|i| ComponentRequest::new(GeoID::new(1, i), i as i64 * 10, 100))
            .collect()
    }

    #[test]
    fn test_field_accessors() {
        let mut header = TriggerRecordHeader::new(&components(2)).unwrap();

        header.set_trigger_number(42).unwrap();
        header.set_trigger_timestamp(123_456_789).unwrap();
        header.set_run_number(7).unwrap();
        header.set_trigger_type(3).unwrap();

        assert_eq!(header.trigger_number(), 42);
        assert_eq!(header.trigger_timestamp(), 123_456_789);
        assert_eq!(header.run_number(), 7);
        assert_eq!(header.trigger_type(), 3);

        let data = header.get_header();
        assert_eq!(data.trigger_number, 42);
        assert_eq!(data.trigger_timestamp, 123_456_789);
        assert_eq!(data.run_number, 7);
        assert_eq!(data.trigger_type, 3);
        assert_eq!(data.num_requested_components, 2);
    }

    #[test]
    fn test_error_bits_touch_only_target_bit() {
        let mut header = TriggerRecordHeader::new(&components(1)).unwrap();
        header.set_error_bits(ErrorBits::new(0b1010)).unwrap();

        header.set_error_bit(0, true).unwrap();
        assert!(header.error_bit(0).unwrap());
        assert_eq!(header.error_bits().raw_value(), 0b1011);

        header.set_error_bit(3, false).unwrap();
        assert_eq!(header.error_bits().raw_value(), 0b0011);

        assert!(matches!(
            header.set_error_bit(32, true),
            Err(DataFormatError::IndexOutOfRange { index: 32, count: 32 })
        ));
        assert_eq!(header.error_bits().raw_value(), 0b0011);
    }

    #[test]
    fn test_with_header_overrides_component_count() {
        let data = TriggerRecordHeaderData {
            trigger_number: 9,
            num_requested_components: 1000,
            ..Default::default()
        };
        let header = TriggerRecordHeader::with_header(data, &components(3)).unwrap();
        assert_eq!(header.num_requested_components(), 3);
        assert_eq!(header.trigger_number(), 9);
    }

    #[test]
    fn test_set_header_fields() {
        let mut header = TriggerRecordHeader::new(&components(2)).unwrap();
        let fields = TriggerRecordHeaderData {
            trigger_record_header_marker: 0,
            version: 99,
            trigger_number: 5,
            trigger_timestamp: 6,
            num_requested_components: 77,
            run_number: 8,
            error_bits: 0b1,
            trigger_type: 2,
            unused: [0; 6],
        };
        header.set_header_fields(&fields).unwrap();

        let data = header.get_header();
        assert_eq!(data.trigger_record_header_marker, TriggerRecordHeaderData::MAGIC);
        assert_eq!(data.version, TriggerRecordHeaderData::VERSION);
        assert_eq!(data.num_requested_components, 2);
        assert_eq!(data.trigger_number, 5);
        assert_eq!(data.trigger_timestamp, 6);
        assert_eq!(data.run_number, 8);
        assert_eq!(data.error_bits, 1);
        assert_eq!(data.trigger_type, 2);
    }

    #[test]
    fn test_components_access() {
        let input = components(4);
        let mut header = TriggerRecordHeader::new(&input).unwrap();

        assert_eq!(header.components().collect::<Vec<_>>(), input);
        assert_eq!(header.at(3).unwrap(), input[3]);
        assert!(matches!(
            header.at(4),
            Err(DataFormatError::IndexOutOfRange { index: 4, count: 4 })
        ));

        header.at_mut(1).unwrap().window_width = 5;
        assert_eq!(header.at(1).unwrap().window_width, 5);

        let replacement = ComponentRequest::new(GeoID::new(9, 9), 1, 2);
        header.set_component(2, replacement).unwrap();
        assert_eq!(header.at(2).unwrap(), replacement);
    }

    #[test]
    fn test_read_only_view_setters_fail() {
        let owner = TriggerRecordHeader::new(&components(1)).unwrap();
        let mut view = TriggerRecordHeader::wrap(owner.storage_location(), BufferAdoptionMode::ReadOnly).unwrap();

        assert!(matches!(view.set_run_number(1), Err(DataFormatError::ReadOnlyBuffer)));
        assert!(matches!(view.set_error_bit(0, true), Err(DataFormatError::ReadOnlyBuffer)));
        assert_eq!(view.run_number(), owner.run_number());
        assert!(view.error_bits().is_empty());
    }
}
