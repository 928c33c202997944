// src/error.rs
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to allocate {size} bytes for record buffer")]
    AllocationFailure { size: usize },

    #[error("Truncated buffer: record requires {required} bytes, buffer holds {actual}")]
    TruncatedBuffer { required: usize, actual: usize },

    #[error("Supplied index {index} is out of range for {count} elements")]
    IndexOutOfRange { index: usize, count: u64 },

    #[error("Invalid record marker: expected {expected:#x}, found {found:#x}")]
    InvalidMarker { expected: u32, found: u32 },

    #[error("Record with {count} trailing elements exceeds addressable memory")]
    SizeOverflow { count: u64 },

    #[error("Invalid record size {size}: smaller than header size {minimum}")]
    InvalidRecordSize { size: u64, minimum: usize },

    #[error("Record buffer is read-only")]
    ReadOnlyBuffer,

    #[error("Element at byte offset {offset} is not aligned for in-place access")]
    Misaligned { offset: usize },

    #[error("Invalid GeoID: {0}")]
    InvalidGeoId(String),
}

pub type Result<T> = std::result::Result<T, DataFormatError>;
