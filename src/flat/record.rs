// src/flat/record.rs
use super::storage::{BufferAdoptionMode, OwnedBuffer, RecordStorage};
use crate::error::{DataFormatError, Result};
use crate::utils::{self, Field};
use bytemuck::Pod;
use bytes::Bytes;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::mem;
use tracing::{debug, trace};

/// Fixed-size header that starts every flat record.
///
/// The header carries its own magic marker and knows how many trailing
/// elements follow it in the buffer.
pub trait RecordHeader: Pod {
    /// Magic constant stored at offset 0
    const MARKER: u32;
    /// Record kind, used in log events
    const NAME: &'static str;

    fn marker(&self) -> u32;
    fn element_count(&self) -> u64;
    fn set_element_count(&mut self, count: u64);

    /// Reject header contents that cannot describe a well-formed record
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A fixed header `H` followed by `element_count()` elements of type `E`,
/// stored contiguously in a single buffer.
///
/// The buffer is either owned by the record or borrowed from the caller,
/// read-only or writable. Every access is bounds checked and goes through byte
/// offsets, so borrowed buffers need no particular alignment except for
/// [`element_mut`](Self::element_mut).
///
/// # Example
///
/// ```
/// use daq_dataformats::{BufferAdoptionMode, ComponentRequest, GeoID, TriggerRecordHeader};
///
/// let components = vec![ComponentRequest::new(GeoID::new(1, 0), 10, 20); 3];
/// let header = TriggerRecordHeader::new(&components).unwrap();
///
/// let view = TriggerRecordHeader::wrap(header.as_bytes(), BufferAdoptionMode::ReadOnly).unwrap();
/// assert_eq!(view.element_count(), 3);
/// assert_eq!(view.total_size_bytes(), header.total_size_bytes());
/// ```
pub struct FlatRecord<'a, H, E> {
    storage: RecordStorage<'a>,
    _layout: PhantomData<fn() -> (H, E)>,
}

impl<'a, H: RecordHeader, E: Pod> FlatRecord<'a, H, E> {
    pub const HEADER_SIZE: usize = mem::size_of::<H>();
    pub const ELEMENT_SIZE: usize = mem::size_of::<E>();

    /// Total buffer size needed for `count` trailing elements
    pub fn required_size(count: u64) -> Result<usize> {
        usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(Self::ELEMENT_SIZE))
            .and_then(|n| n.checked_add(Self::HEADER_SIZE))
            .ok_or(DataFormatError::SizeOverflow { count })
    }

    /// Build an owned record from a header and its elements.
    ///
    /// The element count stored in the header is overwritten with
    /// `elements.len()`.
    pub fn from_elements(header: H, elements: &[E]) -> Result<Self> {
        Self::from_element_chunks(header, &[elements])
    }

    /// Build an owned record whose elements are the concatenation of `chunks`
    pub fn from_element_chunks(mut header: H, chunks: &[&[E]]) -> Result<Self> {
        let count = chunks
            .iter()
            .try_fold(0u64, |acc, chunk| acc.checked_add(chunk.len() as u64))
            .ok_or(DataFormatError::SizeOverflow { count: u64::MAX })?;
        let size = Self::required_size(count)?;

        let mut buffer = OwnedBuffer::zeroed(size)?;
        header.set_element_count(count);

        let bytes = buffer.as_bytes_mut();
        bytes[..Self::HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));

        let mut offset = Self::HEADER_SIZE;
        for &chunk in chunks {
            let raw: &[u8] = bytemuck::cast_slice(chunk);
            bytes[offset..offset + raw.len()].copy_from_slice(raw);
            offset += raw.len();
        }

        debug!(record = H::NAME, elements = count, size, "allocated record buffer");
        Ok(Self::with_storage(RecordStorage::Owned(buffer)))
    }

    /// Adopt an external buffer, either borrowing it or copying it
    pub fn wrap(buffer: &'a [u8], mode: BufferAdoptionMode) -> Result<Self> {
        match mode {
            BufferAdoptionMode::ReadOnly => Self::view(buffer),
            BufferAdoptionMode::CopyFromBuffer => Self::copy_from(buffer),
        }
    }

    /// Borrow `buffer` read-only without copying.
    ///
    /// Bytes past the size implied by the header are ignored.
    pub fn view(buffer: &'a [u8]) -> Result<Self> {
        let required = Self::validate_buffer(buffer)?;
        trace!(record = H::NAME, size = required, "borrowed record buffer");
        Ok(Self::with_storage(RecordStorage::Borrowed(&buffer[..required])))
    }

    /// Borrow `buffer` for reading and writing without copying
    pub fn view_mut(buffer: &'a mut [u8]) -> Result<Self> {
        let required = Self::validate_buffer(buffer)?;
        trace!(record = H::NAME, size = required, "borrowed writable record buffer");
        Ok(Self::with_storage(RecordStorage::BorrowedMut(&mut buffer[..required])))
    }

    /// Copy the record at the start of `buffer` into a new owned buffer.
    ///
    /// The buffer is validated before anything is allocated.
    pub fn copy_from(buffer: &[u8]) -> Result<Self> {
        let required = Self::validate_buffer(buffer)?;
        let owned = OwnedBuffer::try_from_slice(&buffer[..required])?;
        debug!(record = H::NAME, size = required, "copied record buffer");
        Ok(Self::with_storage(RecordStorage::Owned(owned)))
    }

    /// Take ownership of an existing buffer without copying
    pub fn from_owned(mut buffer: OwnedBuffer) -> Result<Self> {
        let required = Self::validate_buffer(buffer.as_bytes())?;
        buffer.truncate(required);
        Ok(Self::with_storage(RecordStorage::Owned(buffer)))
    }

    /// Check that `buffer` starts with a well-formed record and return its size
    fn validate_buffer(buffer: &[u8]) -> Result<usize> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(DataFormatError::TruncatedBuffer {
                required: Self::HEADER_SIZE,
                actual: buffer.len(),
            });
        }

        let header: H = bytemuck::pod_read_unaligned(&buffer[..Self::HEADER_SIZE]);
        if header.marker() != H::MARKER {
            return Err(DataFormatError::InvalidMarker {
                expected: H::MARKER,
                found: header.marker(),
            });
        }
        header.validate()?;

        let required = Self::required_size(header.element_count())?;
        if buffer.len() < required {
            return Err(DataFormatError::TruncatedBuffer {
                required,
                actual: buffer.len(),
            });
        }
        Ok(required)
    }

    fn with_storage(storage: RecordStorage<'a>) -> Self {
        FlatRecord {
            storage,
            _layout: PhantomData,
        }
    }

    /// Copy of the header
    pub fn header(&self) -> H {
        bytemuck::pod_read_unaligned(&self.as_bytes()[..Self::HEADER_SIZE])
    }

    /// Modify the header in place.
    ///
    /// The element count is restored after `f` runs. If `f` changes the
    /// marker the update is rejected and the buffer is left untouched.
    pub fn update_header<F: FnOnce(&mut H)>(&mut self, f: F) -> Result<()> {
        let mut header = self.header();
        let count = header.element_count();
        f(&mut header);
        header.set_element_count(count);

        if header.marker() != H::MARKER {
            return Err(DataFormatError::InvalidMarker {
                expected: H::MARKER,
                found: header.marker(),
            });
        }

        let bytes = self.storage.as_bytes_mut()?;
        bytes[..Self::HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));
        Ok(())
    }

    pub(crate) fn read_field<T: Field>(&self, offset: usize) -> T {
        debug_assert!(offset + T::SIZE <= Self::HEADER_SIZE);
        utils::read_field(self.as_bytes(), offset)
    }

    pub(crate) fn write_field<T: Field>(&mut self, offset: usize, value: T) -> Result<()> {
        debug_assert!(offset + T::SIZE <= Self::HEADER_SIZE);
        let bytes = self.storage.as_bytes_mut()?;
        utils::write_field(bytes, offset, value);
        Ok(())
    }

    pub fn element_count(&self) -> u64 {
        self.header().element_count()
    }

    /// Header size plus `element_count()` elements
    pub fn total_size_bytes(&self) -> usize {
        self.storage.len()
    }

    /// The whole record, header included, ready to be written out as is
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Bytes following the header
    pub fn trailing_bytes(&self) -> &[u8] {
        &self.as_bytes()[Self::HEADER_SIZE..]
    }

    pub fn trailing_bytes_mut(&mut self) -> Result<&mut [u8]> {
        let bytes = self.storage.as_bytes_mut()?;
        Ok(&mut bytes[Self::HEADER_SIZE..])
    }

    fn element_offset(&self, index: usize) -> Result<usize> {
        let count = self.element_count();
        if index as u64 >= count {
            return Err(DataFormatError::IndexOutOfRange { index, count });
        }
        Ok(Self::HEADER_SIZE + index * Self::ELEMENT_SIZE)
    }

    /// Copy of the element at `index`
    pub fn element(&self, index: usize) -> Result<E> {
        let offset = self.element_offset(index)?;
        Ok(bytemuck::pod_read_unaligned(
            &self.as_bytes()[offset..offset + Self::ELEMENT_SIZE],
        ))
    }

    /// Mutable reference to the element at `index`.
    ///
    /// Fails with `Misaligned` when a borrowed buffer does not place the
    /// element on its natural alignment; use [`set_element`](Self::set_element)
    /// in that case.
    pub fn element_mut(&mut self, index: usize) -> Result<&mut E> {
        let offset = self.element_offset(index)?;
        let bytes = self.storage.as_bytes_mut()?;
        bytemuck::try_from_bytes_mut(&mut bytes[offset..offset + Self::ELEMENT_SIZE])
            .map_err(|_| DataFormatError::Misaligned { offset })
    }

    pub fn set_element(&mut self, index: usize, value: E) -> Result<()> {
        let offset = self.element_offset(index)?;
        let bytes = self.storage.as_bytes_mut()?;
        bytes[offset..offset + Self::ELEMENT_SIZE].copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Iterate over copies of the trailing elements in storage order
    pub fn elements(&self) -> impl Iterator<Item = E> + '_ {
        let bytes = self.as_bytes();
        (0..self.element_count() as usize).map(move |index| {
            let offset = Self::HEADER_SIZE + index * Self::ELEMENT_SIZE;
            bytemuck::pod_read_unaligned(&bytes[offset..offset + Self::ELEMENT_SIZE])
        })
    }

    pub fn is_owned(&self) -> bool {
        self.storage.is_owned()
    }

    pub fn is_writable(&self) -> bool {
        self.storage.is_writable()
    }

    /// Owning deep copy, reporting allocator failure as an error
    pub fn try_clone(&self) -> Result<FlatRecord<'static, H, E>> {
        FlatRecord::copy_from(self.as_bytes())
    }

    /// Convert into an owning record; owned buffers are moved, borrowed ones copied
    pub fn into_owned(self) -> Result<FlatRecord<'static, H, E>> {
        let buffer = match self.storage {
            RecordStorage::Owned(buffer) => buffer,
            RecordStorage::Borrowed(bytes) => OwnedBuffer::try_from_slice(bytes)?,
            RecordStorage::BorrowedMut(bytes) => OwnedBuffer::try_from_slice(bytes)?,
        };
        Ok(FlatRecord {
            storage: RecordStorage::Owned(buffer),
            _layout: PhantomData,
        })
    }

    /// Write exactly `total_size_bytes()` bytes to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }

    /// Copy the record into a `Bytes` handle for transport code
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

/// Cloning always produces an owning record, whatever the source's storage
impl<H: RecordHeader, E: Pod> Clone for FlatRecord<'_, H, E> {
    fn clone(&self) -> Self {
        Self::with_storage(RecordStorage::Owned(OwnedBuffer::from_slice(self.as_bytes())))
    }
}

impl<'b, H: RecordHeader, E: Pod> PartialEq<FlatRecord<'b, H, E>> for FlatRecord<'_, H, E> {
    fn eq(&self, other: &FlatRecord<'b, H, E>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<H: RecordHeader + fmt::Debug, E: Pod> fmt::Debug for FlatRecord<'_, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatRecord")
            .field("header", &self.header())
            .field("total_size_bytes", &self.total_size_bytes())
            .field("storage", &self.storage)
            .finish()
    }
}

impl<H: RecordHeader + fmt::Display, E: Pod> fmt::Display for FlatRecord<'_, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}
