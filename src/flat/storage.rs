// src/flat/storage.rs
use crate::error::{DataFormatError, Result};
use std::fmt;

/// How a record adopts a caller-supplied byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferAdoptionMode {
    /// Borrow the buffer without taking ownership; no bytes are copied
    ReadOnly,
    /// Copy the record's bytes into a newly allocated owned buffer
    CopyFromBuffer,
}

/// Heap buffer owned by a record.
///
/// Backed by `u64` words so the start of the buffer is always 8-byte
/// aligned, which lets fixed-size elements be borrowed in place. Only the
/// first `len` bytes are exposed.
#[derive(Clone)]
pub struct OwnedBuffer {
    words: Vec<u64>,
    len: usize,
}

impl OwnedBuffer {
    const WORD_SIZE: usize = std::mem::size_of::<u64>();

    /// Allocate `len` zeroed bytes, reporting allocator failure as an error
    pub fn zeroed(len: usize) -> Result<Self> {
        let word_count = len.div_ceil(Self::WORD_SIZE);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| DataFormatError::AllocationFailure { size: len })?;
        words.resize(word_count, 0);
        Ok(OwnedBuffer { words, len })
    }

    /// Copy `bytes` into a new buffer, reporting allocator failure as an error
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::zeroed(bytes.len())?;
        buffer.as_bytes_mut().copy_from_slice(bytes);
        Ok(buffer)
    }

    /// Copy `bytes` into a new buffer; aborts on allocator failure like `Vec`
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = OwnedBuffer {
            words: vec![0u64; bytes.len().div_ceil(Self::WORD_SIZE)],
            len: bytes.len(),
        };
        buffer.as_bytes_mut().copy_from_slice(bytes);
        buffer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..self.len]
    }

    /// Shorten the visible length; has no effect if `len` is not smaller
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.words.truncate(len.div_ceil(Self::WORD_SIZE));
        }
    }
}

// Words past `len` may hold stale bytes after `truncate`
impl PartialEq for OwnedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for OwnedBuffer {}

// Implement Debug manually to avoid printing large buffers
impl fmt::Debug for OwnedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("len", &self.len)
            .field("capacity", &(self.words.capacity() * Self::WORD_SIZE))
            .finish()
    }
}

/// Backing memory of a record: either owned by it or borrowed from the caller.
///
/// Owned buffers are released when the record is dropped; borrowed buffers
/// never are, and must outlive the record (enforced by `'a`).
pub(crate) enum RecordStorage<'a> {
    Owned(OwnedBuffer),
    Borrowed(&'a [u8]),
    BorrowedMut(&'a mut [u8]),
}

impl<'a> RecordStorage<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RecordStorage::Owned(buffer) => buffer.as_bytes(),
            RecordStorage::Borrowed(bytes) => bytes,
            RecordStorage::BorrowedMut(bytes) => bytes,
        }
    }

    /// Writable view of the bytes; read-only borrows are rejected
    pub fn as_bytes_mut(&mut self) -> Result<&mut [u8]> {
        match self {
            RecordStorage::Owned(buffer) => Ok(buffer.as_bytes_mut()),
            RecordStorage::Borrowed(_) => Err(DataFormatError::ReadOnlyBuffer),
            RecordStorage::BorrowedMut(bytes) => Ok(&mut **bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, RecordStorage::Owned(_))
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, RecordStorage::Borrowed(_))
    }
}

impl fmt::Debug for RecordStorage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            RecordStorage::Owned(_) => "Owned",
            RecordStorage::Borrowed(_) => "Borrowed",
            RecordStorage::BorrowedMut(_) => "BorrowedMut",
        };
        f.debug_struct("RecordStorage")
            .field("mode", &mode)
            .field("len", &self.len())
            .finish()
    }
}
