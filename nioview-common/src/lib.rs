//! Common byte-level primitives of NIO view buffers.
//!
//! All typed access to raw bytes goes through [`byte_repr::ByteRepr`],
//! and all bytes live in a shared [`storage::Storage`] region.
pub mod byte_repr;
pub mod error;
pub mod storage;

pub use byte_repr::{ByteOrder, ByteRepr, BYTE_ORDER};
pub use error::{Error, Result};
pub use storage::Storage;
