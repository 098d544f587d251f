use crate::cursor::{Cursor, ViewState};
use nioview_common::byte_repr::{ByteOrder, ByteRepr, BYTE_ORDER};
use nioview_common::error::{Error, Result};
use nioview_common::storage::Storage;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

pub type ByteBuffer = Buffer<u8>;
pub type CharBuffer = Buffer<u16>;
pub type ShortBuffer = Buffer<i16>;
pub type IntBuffer = Buffer<i32>;
pub type LongBuffer = Buffer<i64>;
pub type FloatBuffer = Buffer<f32>;
pub type DoubleBuffer = Buffer<f64>;

/// Buffer is a typed view over shared byte storage.
///
/// Each view owns its cursor, but not the storage: views derived by
/// slicing, duplication or casting alias the same bytes, and writes
/// through any writable view are visible to all of them immediately.
///
/// Element `i` of the view lives at byte `offset_u8 + i * T::WIDTH`
/// of the storage, encoded with [`BYTE_ORDER`].
pub struct Buffer<T> {
    pub(crate) storage: Option<Storage>,
    // byte offset of element 0, fixed at creation.
    pub(crate) offset_u8: usize,
    pub(crate) cursor: Cursor,
    pub(crate) read_only: bool,
    pub(crate) _marker: PhantomData<T>,
}

impl<T: ByteRepr> Buffer<T> {
    /// Create a buffer over fresh zeroed storage of `cap` elements.
    #[inline]
    pub fn new(cap: usize, pos: usize, limit: usize) -> Result<Self> {
        let cursor = Cursor::new(cap, pos, limit)?;
        let cap_u8 = cap.checked_mul(T::WIDTH).ok_or_else(|| {
            Error::InvalidArgument(format!("capacity {} too large", cap))
        })?;
        Ok(Buffer::from_parts(
            Some(Storage::zeroed(cap_u8)),
            0,
            cursor,
            false,
        ))
    }

    /// Create a buffer over fresh zeroed storage, spanning whole capacity.
    #[inline]
    pub fn allocate(cap: usize) -> Result<Self> {
        Buffer::new(cap, 0, cap)
    }

    /// Create a buffer aliasing given storage.
    /// Capacity is the number of whole elements the storage holds.
    #[inline]
    pub fn wrap(storage: &Storage, pos: usize, limit: usize) -> Result<Self> {
        let cap = storage.cap_u8() / T::WIDTH;
        let cursor = Cursor::new(cap, pos, limit)?;
        Ok(Buffer::from_parts(Some(storage.clone()), 0, cursor, false))
    }

    /// Create an empty buffer without any storage.
    #[inline]
    pub fn unbacked() -> Self {
        Buffer::from_parts(None, 0, Cursor::full(0), false)
    }

    #[inline]
    pub(crate) fn from_parts(
        storage: Option<Storage>,
        offset_u8: usize,
        cursor: Cursor,
        read_only: bool,
    ) -> Self {
        debug_assert!(storage
            .as_ref()
            .map(|s| offset_u8 + cursor.capacity() * T::WIDTH <= s.cap_u8())
            .unwrap_or(cursor.capacity() == 0));
        Buffer {
            storage,
            offset_u8,
            cursor,
            read_only,
            _marker: PhantomData,
        }
    }

    /* cursor control */

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        self.cursor.set_position(pos)
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.cursor.limit()
    }

    #[inline]
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        self.cursor.set_limit(limit)
    }

    #[inline]
    pub fn mark(&mut self) {
        self.cursor.mark()
    }

    #[inline]
    pub fn marked(&self) -> Option<usize> {
        self.cursor.marked()
    }

    #[inline]
    pub fn reset(&mut self) -> Result<()> {
        self.cursor.reset()
    }

    #[inline]
    pub fn discard_mark(&mut self) {
        self.cursor.discard_mark()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cursor.clear()
    }

    #[inline]
    pub fn flip(&mut self) {
        self.cursor.flip()
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.cursor.rewind()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    #[inline]
    pub fn state(&self) -> ViewState {
        self.cursor.state(self.read_only)
    }

    /* introspection */

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether in-memory storage backs this view.
    #[inline]
    pub fn is_backed(&self) -> bool {
        self.storage.is_some()
    }

    /// Returns byte order of multi-byte elements.
    #[inline]
    pub fn order(&self) -> ByteOrder {
        BYTE_ORDER
    }

    /// Returns offset of element 0 in storage, in elements of this view.
    /// Views cast from narrower widths may start in the middle of an
    /// element, in which case the offset is rounded down.
    #[inline]
    pub fn array_offset(&self) -> usize {
        self.offset_u8 / T::WIDTH
    }

    /// Returns offset of element 0 in storage, in bytes.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.offset_u8
    }

    #[inline]
    pub fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    /// Returns whether two views alias the same storage.
    #[inline]
    pub fn shares_storage<U>(&self, other: &Buffer<U>) -> bool {
        match (&self.storage, &other.storage) {
            (Some(s1), Some(s2)) => s1.ptr_eq(s2),
            _ => false,
        }
    }

    /* element access */

    /// Read element at position and advance.
    #[inline]
    pub fn get(&mut self) -> Result<T> {
        self.get_as::<T>()
    }

    /// Write element at position and advance.
    #[inline]
    pub fn put(&mut self, value: T) -> Result<()> {
        self.put_as::<T>(value)
    }

    /// Read element at index, which is relative to origin of the view.
    #[inline]
    pub fn get_at(&self, index: usize) -> Result<T> {
        self.get_as_at::<T>(index)
    }

    /// Write element at index, which is relative to origin of the view.
    #[inline]
    pub fn put_at(&mut self, index: usize, value: T) -> Result<()> {
        self.put_as_at::<T>(index, value)
    }

    /// Fill target with elements starting at position, and advance.
    /// Fails without reading if not enough elements remain.
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<()> {
        let pos = self.cursor.check_get(dst.len())?;
        if !dst.is_empty() {
            let bytes = self.read_bytes(pos, dst.len())?;
            T::memload(&bytes, dst);
        }
        self.cursor.advance(dst.len());
        Ok(())
    }

    /// Write all elements of source starting at position, and advance.
    /// Fails without writing if not enough space remains.
    pub fn put_slice(&mut self, src: &[T]) -> Result<()> {
        self.check_writable()?;
        let pos = self.cursor.check_put(src.len())?;
        if !src.is_empty() {
            let mut bytes = vec![0u8; src.len() * T::WIDTH];
            T::memcpy(src, &mut bytes);
            self.write_bytes(pos, &bytes)?;
        }
        self.cursor.advance(src.len());
        Ok(())
    }

    /// Move all remaining elements of source into this buffer.
    /// Both positions advance by the number of elements moved.
    pub fn put_buffer(&mut self, src: &mut Buffer<T>) -> Result<()> {
        self.check_writable()?;
        let n = src.remaining();
        let pos = self.cursor.check_put(n)?;
        if n > 0 {
            let bytes = src.read_bytes(src.position(), n)?;
            self.write_bytes(pos, &bytes)?;
        }
        src.cursor.advance(n);
        self.cursor.advance(n);
        Ok(())
    }

    /// Copy out remaining elements, without moving position.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let n = self.remaining();
        let mut res = vec![T::default(); n];
        if n > 0 {
            let bytes = self.read_bytes(self.position(), n)?;
            T::memload(&bytes, &mut res);
        }
        Ok(res)
    }

    /* derivation */

    /// Create a view of the remaining elements.
    ///
    /// The slice starts at current position, with capacity and limit
    /// equal to remaining count. Storage and read-only flag are shared
    /// with this view.
    #[inline]
    pub fn slice(&self) -> Buffer<T> {
        let offset_u8 = self.offset_u8 + self.position() * T::WIDTH;
        log::trace!(
            "slice buffer at byte offset {} with {} elements",
            offset_u8,
            self.remaining()
        );
        Buffer::from_parts(
            self.storage.clone(),
            offset_u8,
            self.cursor.slice(),
            self.read_only,
        )
    }

    /// Create a view with identical bounds and independent cursor.
    #[inline]
    pub fn duplicate(&self) -> Buffer<T> {
        self.clone()
    }

    /// Create a read-only view with identical bounds.
    /// No view derived from it can be writable.
    #[inline]
    pub fn as_read_only(&self) -> Buffer<T> {
        let mut res = self.clone();
        res.read_only = true;
        res
    }

    /// Discard elements before position.
    ///
    /// Remaining elements are moved to the origin, position is set to
    /// their count and limit to capacity. The mark is discarded.
    pub fn compact(&mut self) -> Result<()> {
        self.check_writable()?;
        let pos = self.position();
        let n = self.remaining();
        if pos > 0 && n > 0 {
            let storage = self.backing()?;
            let start = self.offset_u8 + pos * T::WIDTH;
            storage.copy_within(start..start + n * T::WIDTH, self.offset_u8);
        }
        log::trace!("compact buffer: moved {} elements from {}", n, pos);
        self.cursor.compacted(n);
        Ok(())
    }

    /* internal helpers */

    #[inline]
    pub(crate) fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn backing(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::InternalError("buffer has no storage".to_string()))
    }

    /// Returns byte offset of element at given index.
    #[inline]
    pub(crate) fn byte_at(&self, index: usize) -> usize {
        self.offset_u8 + index * T::WIDTH
    }

    fn read_bytes(&self, index: usize, n: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; n * T::WIDTH];
        self.backing()?.read_into(self.byte_at(index), &mut bytes);
        Ok(bytes)
    }

    fn write_bytes(&self, index: usize, bytes: &[u8]) -> Result<()> {
        self.backing()?.write_from(self.byte_at(index), bytes);
        Ok(())
    }
}

/// Cloning a buffer copies its cursor and read-only flag, and shares
/// the storage. The mark is kept, same as [`Buffer::duplicate`].
impl<T> Clone for Buffer<T> {
    #[inline]
    fn clone(&self) -> Self {
        Buffer {
            storage: self.storage.clone(),
            offset_u8: self.offset_u8,
            cursor: self.cursor,
            read_only: self.read_only,
            _marker: PhantomData,
        }
    }
}

impl<T: ByteRepr> Default for Buffer<T> {
    #[inline]
    fn default() -> Self {
        Buffer::unbacked()
    }
}

/// Two buffers are equal if their remaining elements are equal.
impl<T: ByteRepr> PartialEq for Buffer<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.remaining() != other.remaining() {
            return false;
        }
        let (p1, p2) = (self.position(), other.position());
        (0..self.remaining()).all(|i| {
            match (self.get_at(p1 + i), other.get_at(p2 + i)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        })
    }
}

/// Buffers are ordered lexicographically by remaining elements.
impl<T: ByteRepr> PartialOrd for Buffer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (p1, p2) = (self.position(), other.position());
        let n = self.remaining().min(other.remaining());
        for i in 0..n {
            let a = self.get_at(p1 + i).ok()?;
            let b = other.get_at(p2 + i).ok()?;
            match a.partial_cmp(&b)? {
                Ordering::Equal => (),
                ord => return Some(ord),
            }
        }
        Some(self.remaining().cmp(&other.remaining()))
    }
}

impl<T: ByteRepr> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &T::WIDTH)
            .field("position", &self.position())
            .field("limit", &self.limit())
            .field("capacity", &self.capacity())
            .field("read_only", &self.read_only)
            .field("backed", &self.is_backed())
            .finish()
    }
}
