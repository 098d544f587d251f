//! Typed view buffers over shared byte storage.
//!
//! A [`Buffer`] reads and writes elements of one primitive width,
//! either sequentially through its cursor or by explicit index.
//! Views can be sliced, duplicated, made read-only, or cast to a
//! different element width; all derived views alias the bytes of
//! their origin, each with an independent cursor.
pub mod buffer;
pub mod cast;
pub mod cursor;
pub mod spec;

pub use buffer::{
    Buffer, ByteBuffer, CharBuffer, DoubleBuffer, FloatBuffer, IntBuffer, LongBuffer, ShortBuffer,
};
pub use cursor::{Cursor, ViewState};
pub use nioview_common::{ByteOrder, ByteRepr, Error, Result, Storage, BYTE_ORDER};
pub use spec::{BufferSpec, DEFAULT_BUFFER_CAPACITY};
