use smallvec::SmallVec;
use std::fmt::Debug;

/// Byte order used to lay out multi-byte elements in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// The single byte order of all views.
///
/// Every encode and decode goes through [`ByteRepr`], which always uses
/// big-endian layout regardless of the host.
pub const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;

/// Element type storable in a view buffer.
///
/// This is the only place where typed values and raw bytes meet.
/// `Pod` guarantees that any byte pattern read back from storage is a
/// valid value of the type, so reinterpreting bytes written at another
/// width is always sound.
pub trait ByteRepr: bytemuck::Pod + Default + PartialEq + PartialOrd + Debug {
    /// Number of bytes occupied by one element.
    const WIDTH: usize;

    fn to_bytes(&self) -> SmallVec<[u8; 16]>;

    /// Decode value from the first `WIDTH` bytes of input.
    ///
    /// Input must contain at least `WIDTH` bytes.
    fn from_bytes(bs: &[u8]) -> Self;

    /// Encode value into the first `WIDTH` bytes of output.
    ///
    /// Output must contain at least `WIDTH` bytes.
    fn write_bytes(&self, buf: &mut [u8]);

    /// Encode all values into target bytes, which must be exactly
    /// `src.len() * WIDTH` long.
    #[inline]
    fn memcpy(src: &[Self], tgt: &mut [u8]) {
        assert_eq!(tgt.len(), src.len() * Self::WIDTH);
        for (chk, v) in tgt.chunks_exact_mut(Self::WIDTH).zip(src) {
            v.write_bytes(chk);
        }
    }

    /// Decode all values from source bytes, which must be exactly
    /// `tgt.len() * WIDTH` long.
    #[inline]
    fn memload(src: &[u8], tgt: &mut [Self]) {
        assert_eq!(src.len(), tgt.len() * Self::WIDTH);
        for (chk, v) in src.chunks_exact(Self::WIDTH).zip(tgt) {
            *v = Self::from_bytes(chk);
        }
    }
}

macro_rules! impl_num {
    ($ty:ty) => {
        impl ByteRepr for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn to_bytes(&self) -> SmallVec<[u8; 16]> {
                self.to_be_bytes().into_iter().collect()
            }

            #[inline]
            fn from_bytes(bs: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bs[..Self::WIDTH]);
                <$ty>::from_be_bytes(raw)
            }

            #[inline]
            fn write_bytes(&self, buf: &mut [u8]) {
                let bs = self.to_be_bytes();
                buf[..Self::WIDTH].copy_from_slice(&bs);
            }
        }
    };
}

impl_num!(u8);
impl_num!(i8);
impl_num!(u16);
impl_num!(i16);
impl_num!(u32);
impl_num!(i32);
impl_num!(u64);
impl_num!(i64);
impl_num!(f32);
impl_num!(f64);
