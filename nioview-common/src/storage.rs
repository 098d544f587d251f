use crate::byte_repr::ByteRepr;
use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Storage is a fixed-capacity byte region shared by buffer views.
///
/// Cloning a storage handle does not copy bytes: all clones alias
/// the same region, and the region is released once the last handle
/// is dropped.
/// The capacity never changes after construction.
///
/// Storage is single-threaded. Views over the same storage must be
/// synchronized externally if handed across threads, which the `Rc`
/// handle prevents at compile time.
#[derive(Clone)]
pub struct Storage {
    inner: Rc<RefCell<Box<[u8]>>>,
}

impl Storage {
    /// Create a new zero-initialized storage of given bytes.
    #[inline]
    pub fn zeroed(cap_u8: usize) -> Self {
        Storage::from(vec![0u8; cap_u8])
    }

    /// Returns byte capacity.
    #[inline]
    pub fn cap_u8(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether two handles point to the same region.
    #[inline]
    pub fn ptr_eq(&self, other: &Storage) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns number of live handles of this region.
    #[inline]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Decode one value starting at given byte offset.
    ///
    /// Caller must guarantee `at_u8 + U::WIDTH <= cap_u8()`.
    #[inline]
    pub fn load<U: ByteRepr>(&self, at_u8: usize) -> U {
        let inner = self.inner.borrow();
        U::from_bytes(&inner[at_u8..at_u8 + U::WIDTH])
    }

    /// Encode one value starting at given byte offset.
    ///
    /// Caller must guarantee `at_u8 + U::WIDTH <= cap_u8()`.
    #[inline]
    pub fn store<U: ByteRepr>(&self, at_u8: usize, value: U) {
        let mut inner = self.inner.borrow_mut();
        value.write_bytes(&mut inner[at_u8..at_u8 + U::WIDTH]);
    }

    /// Copy bytes starting at given offset into target.
    #[inline]
    pub fn read_into(&self, at_u8: usize, dst: &mut [u8]) {
        let inner = self.inner.borrow();
        dst.copy_from_slice(&inner[at_u8..at_u8 + dst.len()]);
    }

    /// Overwrite bytes starting at given offset with source.
    #[inline]
    pub fn write_from(&self, at_u8: usize, src: &[u8]) {
        let mut inner = self.inner.borrow_mut();
        inner[at_u8..at_u8 + src.len()].copy_from_slice(src);
    }

    /// Move a byte range to the given destination offset.
    /// Source and destination may overlap.
    #[inline]
    pub fn copy_within(&self, src: Range<usize>, dest_u8: usize) {
        self.inner.borrow_mut().copy_within(src, dest_u8);
    }

    /// Copy out the whole region.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.borrow().to_vec()
    }
}

impl From<Vec<u8>> for Storage {
    #[inline]
    fn from(src: Vec<u8>) -> Self {
        Storage {
            inner: Rc::new(RefCell::new(src.into_boxed_slice())),
        }
    }
}

impl From<&[u8]> for Storage {
    #[inline]
    fn from(src: &[u8]) -> Self {
        Storage::from(src.to_vec())
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("cap_u8", &self.cap_u8())
            .field("handles", &self.handle_count())
            .finish()
    }
}
