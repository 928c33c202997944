// tests/trigger_record_header_tests.rs
use daq_dataformats::*;

fn sample_components(count: u32) -> Vec<ComponentRequest> {
    (0..count)
        .map(|i| ComponentRequest::new(GeoID::new(i / 4, i % 4), 500 + i as i64, 1000))
        .collect()
}

fn sample_header(count: u32) -> TriggerRecordHeader<'static> {
    let mut header = TriggerRecordHeader::new(&sample_components(count)).unwrap();
    header.set_trigger_number(42).unwrap();
    header.set_trigger_timestamp(1_000_000).unwrap();
    header.set_run_number(7).unwrap();
    header.set_trigger_type(2).unwrap();
    header.set_error_bit(5, true).unwrap();
    header
}

#[test]
fn test_build_preserves_order_and_count() {
    let components = sample_components(10);
    let header = TriggerRecordHeader::new(&components).unwrap();

    assert_eq!(header.element_count(), 10);
    for (i, expected) in components.iter().enumerate() {
        assert_eq!(header.at(i).unwrap(), *expected);
    }
}

#[test]
fn test_copy_wrap_roundtrip() {
    let original = sample_header(3);
    let copy = TriggerRecordHeader::wrap(original.storage_location(), BufferAdoptionMode::CopyFromBuffer).unwrap();

    assert!(copy.is_owned());
    assert_eq!(copy.get_header(), original.get_header());
    assert_eq!(copy.components().collect::<Vec<_>>(), original.components().collect::<Vec<_>>());
    assert_eq!(copy.total_size_bytes(), original.total_size_bytes());
    assert_ne!(copy.as_bytes().as_ptr(), original.as_bytes().as_ptr());
}

#[test]
fn test_borrowed_view_shares_memory() {
    let original = sample_header(2);
    let view = TriggerRecordHeader::wrap(original.as_bytes(), BufferAdoptionMode::ReadOnly).unwrap();

    assert!(!view.is_owned());
    assert_eq!(view.as_bytes().as_ptr(), original.as_bytes().as_ptr());
    assert_eq!(view.trigger_number(), 42);
    assert_eq!(view.run_number(), 7);
    assert!(view.error_bit(5).unwrap());
}

#[test]
fn test_clone_of_borrowed_is_independent() {
    let original = sample_header(3);
    let view = TriggerRecordHeader::view(original.as_bytes()).unwrap();

    let mut copy = view.clone();
    assert!(copy.is_owned());

    copy.at_mut(0).unwrap().window_offset = -1;
    copy.set_trigger_number(43).unwrap();

    assert_eq!(copy.at(0).unwrap().window_offset, -1);
    assert_eq!(view.at(0).unwrap().window_offset, 500);
    assert_eq!(original.trigger_number(), 42);
}

#[test]
fn test_owned_copy_outlives_source() {
    let original = sample_header(3);
    let view = TriggerRecordHeader::view(original.as_bytes()).unwrap();
    let copy: TriggerRecordHeader<'static> = view.try_clone().unwrap();

    drop(view);
    drop(original);
    assert_eq!(copy.at(2).unwrap().window_offset, 502);
    assert_eq!(copy.trigger_number(), 42);
}

#[test]
fn test_clone_of_owned_is_independent() {
    let original = sample_header(2);
    let mut copy = original.try_clone().unwrap();
    copy.set_component(1, ComponentRequest::default()).unwrap();

    assert_eq!(copy.at(1).unwrap(), ComponentRequest::default());
    assert_ne!(original.at(1).unwrap(), ComponentRequest::default());
}

#[test]
fn test_move_keeps_buffer() {
    let original = sample_header(4);
    let ptr = original.as_bytes().as_ptr();

    let moved = original;
    assert_eq!(moved.as_bytes().as_ptr(), ptr);
    assert_eq!(moved.num_requested_components(), 4);
}

#[test]
fn test_index_bounds() {
    let header = sample_header(3);
    let count = header.element_count() as usize;

    assert!(header.at(count - 1).is_ok());
    for index in [count, count + 1, usize::MAX] {
        match header.at(index) {
            Err(DataFormatError::IndexOutOfRange { index: i, count: c }) => {
                assert_eq!(i, index);
                assert_eq!(c, 3);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
    }
}

#[test]
fn test_truncated_buffer_is_rejected() {
    let header = sample_header(3);
    let bytes = header.as_bytes();

    for len in [0, 1, TriggerRecordHeader::HEADER_SIZE - 1, TriggerRecordHeader::HEADER_SIZE, bytes.len() - 1] {
        let result = TriggerRecordHeader::wrap(&bytes[..len], BufferAdoptionMode::CopyFromBuffer);
        assert!(
            matches!(result, Err(DataFormatError::TruncatedBuffer { .. })),
            "length {} should be truncated",
            len
        );
    }

    match TriggerRecordHeader::copy_from(&bytes[..bytes.len() - 1]) {
        Err(DataFormatError::TruncatedBuffer { required, actual }) => {
            assert_eq!(required, bytes.len());
            assert_eq!(actual, bytes.len() - 1);
        }
        other => panic!("Expected TruncatedBuffer, got {:?}", other),
    }
}

#[test]
fn test_zero_components() {
    let header = TriggerRecordHeader::new(&[]).unwrap();
    assert_eq!(header.num_requested_components(), 0);
    assert_eq!(header.total_size_bytes(), TriggerRecordHeaderData::SIZE);
    assert_eq!(header.components().count(), 0);
    assert!(header.at(0).is_err());
}

#[test]
fn test_writable_view_over_external_buffer() {
    let original = sample_header(2);
    let mut external = original.as_bytes().to_vec();

    {
        let mut view = TriggerRecordHeader::view_mut(&mut external).unwrap();
        view.set_run_number(99).unwrap();
        view.set_error_bits(ErrorBits::empty()).unwrap();
        let mut component = view.at(1).unwrap();
        component.window_width = 1;
        view.set_component(1, component).unwrap();
    }

    let reread = TriggerRecordHeader::copy_from(&external).unwrap();
    assert_eq!(reread.run_number(), 99);
    assert!(reread.error_bits().is_empty());
    assert_eq!(reread.at(1).unwrap().window_width, 1);
    assert_eq!(original.run_number(), 7);
}

#[test]
fn test_formatted_header() {
    let header = sample_header(3);
    let text = header.to_string();

    assert!(text.contains("check_word: 33334444"));
    assert!(text.contains("trigger_number: 42"));
    assert!(text.contains("run_number: 7"));
    assert!(text.contains("trigger_timestamp: 1000000"));
    assert!(text.contains("error_bits: 32"));
    assert!(text.contains("num_requested_components: 3"));
}

#[test]
fn test_stream_output() {
    let header = sample_header(5);
    let mut sink: Vec<u8> = Vec::new();
    header.write_to(&mut sink).unwrap();

    assert_eq!(sink.len(), header.total_size_bytes());
    let reread = TriggerRecordHeader::view(&sink).unwrap();
    assert_eq!(reread, header);
}
