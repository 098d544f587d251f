use crate::buffer::Buffer;
use crate::cursor::Cursor;
use nioview_common::byte_repr::ByteRepr;
use nioview_common::error::{Error, Result};
use nioview_common::storage::Storage;

pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Construction parameters of a buffer view.
///
/// Capacity, position and limit are counted in elements of the
/// buffer to build. When wrapping existing storage, capacity is
/// derived from the storage instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpec {
    pub capacity: usize,
    pub position: usize,
    /// Defaults to capacity if not set.
    pub limit: Option<usize>,
    pub read_only: bool,
}

impl Default for BufferSpec {
    #[inline]
    fn default() -> Self {
        BufferSpec {
            capacity: DEFAULT_BUFFER_CAPACITY,
            position: 0,
            limit: None,
            read_only: false,
        }
    }
}

impl BufferSpec {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        BufferSpec {
            capacity,
            ..Default::default()
        }
    }

    #[inline]
    pub fn position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[inline]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Allocate zeroed storage and build a view over it.
    #[inline]
    pub fn allocate<T: ByteRepr>(&self) -> Result<Buffer<T>> {
        let cursor = self.cursor(self.capacity)?;
        let cap_u8 = self.capacity.checked_mul(T::WIDTH).ok_or_else(|| {
            Error::InvalidArgument(format!("capacity {} too large", self.capacity))
        })?;
        Ok(Buffer::from_parts(
            Some(Storage::zeroed(cap_u8)),
            0,
            cursor,
            self.read_only,
        ))
    }

    /// Build a view aliasing given storage.
    #[inline]
    pub fn wrap<T: ByteRepr>(&self, storage: &Storage) -> Result<Buffer<T>> {
        let cursor = self.cursor(storage.cap_u8() / T::WIDTH)?;
        Ok(Buffer::from_parts(
            Some(storage.clone()),
            0,
            cursor,
            self.read_only,
        ))
    }

    #[inline]
    fn cursor(&self, capacity: usize) -> Result<Cursor> {
        Cursor::new(capacity, self.position, self.limit.unwrap_or(capacity))
    }
}
