use nioview_common::error::{Error, Result};

/// Cursor tracks sequential access over a view.
///
/// Invariant: `mark <= position <= limit <= capacity` holds after
/// every operation. All values are counted in elements of the owning
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    cap: usize,
    limit: usize,
    pos: usize,
    mark: Option<usize>,
    // whether any relative access succeeded since construction or clear.
    accessed: bool,
}

/// Observable state of a view.
///
/// Only operations that move the cursor count as access. Absolute
/// reads and writes by index leave the state as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    /// No access since construction or last clear.
    Fresh,
    /// At least one successful relative access.
    Active,
    /// A mark is set.
    Marked,
    /// Position reached limit.
    Exhausted,
    /// Mutation is forbidden through this view.
    ReadOnly,
}

impl Cursor {
    /// Create a cursor with given capacity, position and limit.
    #[inline]
    pub fn new(cap: usize, pos: usize, limit: usize) -> Result<Self> {
        if limit > cap || pos > limit {
            log::debug!(
                "reject cursor with position {} limit {} capacity {}",
                pos,
                limit,
                cap
            );
            return Err(Error::InvalidArgument(format!(
                "position {} limit {} capacity {}",
                pos, limit, cap
            )));
        }
        Ok(Cursor {
            cap,
            limit,
            pos,
            mark: None,
            accessed: false,
        })
    }

    /// Create a cursor spanning whole capacity with position at zero.
    #[inline]
    pub fn full(cap: usize) -> Self {
        Cursor {
            cap,
            limit: cap,
            pos: 0,
            mark: None,
            accessed: false,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the mark if set.
    #[inline]
    pub fn marked(&self) -> Option<usize> {
        self.mark
    }

    /// Set new position.
    /// The mark is discarded if it is beyond new position.
    #[inline]
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.limit {
            return Err(Error::InvalidArgument(format!(
                "position {} exceeds limit {}",
                pos, self.limit
            )));
        }
        self.pos = pos;
        if matches!(self.mark, Some(m) if m > pos) {
            self.mark = None;
        }
        Ok(())
    }

    /// Set new limit.
    /// Position is clamped to new limit, and the mark is discarded
    /// if it is beyond new limit.
    #[inline]
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.cap {
            return Err(Error::InvalidArgument(format!(
                "limit {} exceeds capacity {}",
                limit, self.cap
            )));
        }
        self.limit = limit;
        if self.pos > limit {
            self.pos = limit;
        }
        if matches!(self.mark, Some(m) if m > limit) {
            self.mark = None;
        }
        Ok(())
    }

    /// Mark current position.
    #[inline]
    pub fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Move position back to the mark.
    #[inline]
    pub fn reset(&mut self) -> Result<()> {
        match self.mark {
            Some(m) => {
                self.pos = m;
                Ok(())
            }
            None => Err(Error::InvalidMark),
        }
    }

    #[inline]
    pub fn discard_mark(&mut self) {
        self.mark = None;
    }

    /// Reset cursor to its fresh form: position zero, limit at capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.pos = 0;
        self.limit = self.cap;
        self.mark = None;
        self.accessed = false;
    }

    /// Limit to current position and rewind, switching from filling
    /// to draining.
    #[inline]
    pub fn flip(&mut self) {
        self.limit = self.pos;
        self.pos = 0;
        self.mark = None;
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.mark = None;
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.pos < self.limit
    }

    /// Returns state of the cursor, given read-only flag of the view.
    #[inline]
    pub fn state(&self, read_only: bool) -> ViewState {
        if read_only {
            ViewState::ReadOnly
        } else if self.pos == self.limit {
            ViewState::Exhausted
        } else if self.mark.is_some() {
            ViewState::Marked
        } else if self.accessed {
            ViewState::Active
        } else {
            ViewState::Fresh
        }
    }

    /// Returns position if `n` elements can be read from it.
    /// Cursor is not advanced.
    #[inline]
    pub(crate) fn check_get(&self, n: usize) -> Result<usize> {
        if self.remaining() < n {
            return Err(Error::BufferUnderflow);
        }
        Ok(self.pos)
    }

    /// Returns position if `n` elements can be written from it.
    /// Cursor is not advanced.
    #[inline]
    pub(crate) fn check_put(&self, n: usize) -> Result<usize> {
        if self.remaining() < n {
            return Err(Error::BufferOverflow);
        }
        Ok(self.pos)
    }

    /// Check `n` elements starting at index are within limit.
    #[inline]
    pub(crate) fn check_index(&self, index: usize, n: usize) -> Result<()> {
        match index.checked_add(n) {
            Some(end) if end <= self.limit => Ok(()),
            _ => Err(Error::IndexOutOfBound(format!(
                "index {} width {} limit {}",
                index, n, self.limit
            ))),
        }
    }

    /// Advance position after a successful relative access.
    /// Caller must have checked remaining elements.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(self.remaining() >= n);
        self.pos += n;
        self.accessed = true;
    }

    /// Cursor of a slice starting at current position.
    #[inline]
    pub(crate) fn slice(&self) -> Cursor {
        Cursor::full(self.remaining())
    }

    /// Update cursor after `n` remaining elements were moved to origin.
    #[inline]
    pub(crate) fn compacted(&mut self, n: usize) {
        debug_assert!(n <= self.cap);
        self.pos = n;
        self.limit = self.cap;
        self.mark = None;
        self.accessed = true;
    }
}
