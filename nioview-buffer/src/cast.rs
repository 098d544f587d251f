//! Width reinterpretation of buffer views.
//!
//! A view of element width `W` over `N = limit * W` bytes can be read
//! as a view of any other width `W'`, covering the first `N / W'`
//! whole elements of the same bytes. Values are always decoded and
//! encoded in [`BYTE_ORDER`](nioview_common::BYTE_ORDER), so the result
//! depends only on stored bytes and never on the host.
use crate::buffer::Buffer;
use crate::cursor::Cursor;
use nioview_common::byte_repr::ByteRepr;
use nioview_common::error::Result;

impl<T: ByteRepr> Buffer<T> {
    /// Reinterpret bytes up to limit as elements of type `U`.
    ///
    /// The new view starts at the origin of this view, with capacity
    /// and limit equal to the number of whole `U` elements, and
    /// position zero. Trailing bytes that do not form a whole element
    /// are not addressable through the new view.
    /// Storage is shared and the read-only flag is kept.
    #[inline]
    pub fn cast<U: ByteRepr>(&self) -> Buffer<U> {
        let n_u8 = self.limit() * T::WIDTH;
        let cap = n_u8 / U::WIDTH;
        log::trace!(
            "cast buffer of width {} to width {}: {} bytes, {} elements",
            T::WIDTH,
            U::WIDTH,
            n_u8,
            cap
        );
        Buffer::from_parts(
            self.storage.clone(),
            self.offset_u8,
            Cursor::full(cap),
            self.read_only,
        )
    }

    /// Number of elements of this view covered by one value of `U`.
    #[inline]
    fn elems_of<U: ByteRepr>() -> usize {
        U::WIDTH.div_ceil(T::WIDTH)
    }

    /// Read a value of type `U` at position, and advance by the
    /// number of elements it covers.
    #[inline]
    pub fn get_as<U: ByteRepr>(&mut self) -> Result<U> {
        let n = Self::elems_of::<U>();
        let pos = self.cursor.check_get(n)?;
        let value = self.backing()?.load::<U>(self.byte_at(pos));
        self.cursor.advance(n);
        Ok(value)
    }

    /// Write a value of type `U` at position, and advance by the
    /// number of elements it covers.
    #[inline]
    pub fn put_as<U: ByteRepr>(&mut self, value: U) -> Result<()> {
        self.check_writable()?;
        let n = Self::elems_of::<U>();
        let pos = self.cursor.check_put(n)?;
        self.backing()?.store(self.byte_at(pos), value);
        self.cursor.advance(n);
        Ok(())
    }

    /// Read a value of type `U` starting at element index.
    #[inline]
    pub fn get_as_at<U: ByteRepr>(&self, index: usize) -> Result<U> {
        self.cursor.check_index(index, Self::elems_of::<U>())?;
        Ok(self.backing()?.load::<U>(self.byte_at(index)))
    }

    /// Write a value of type `U` starting at element index.
    /// Cursor and state of the view are unchanged.
    #[inline]
    pub fn put_as_at<U: ByteRepr>(&mut self, index: usize, value: U) -> Result<()> {
        self.check_writable()?;
        self.cursor.check_index(index, Self::elems_of::<U>())?;
        self.backing()?.store(self.byte_at(index), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::*;
    use nioview_common::byte_repr::ByteRepr;
    use nioview_common::error::Error;
    use nioview_common::storage::Storage;

    #[test]
    fn test_cast_float_to_bytes() -> Result<(), Error> {
        let mut buf = FloatBuffer::allocate(8)?;
        buf.put_at(0, 1.5)?;
        buf.put_at(1, 2.5)?;
        let mut bytes = buf.cast::<u8>();
        assert_eq!(32, bytes.capacity());
        assert_eq!(32, bytes.limit());
        assert_eq!(0, bytes.position());
        let mut expected = Vec::new();
        expected.extend_from_slice(&1.5f32.to_be_bytes());
        expected.extend_from_slice(&2.5f32.to_be_bytes());
        let mut actual = vec![0u8; 8];
        bytes.get_slice(&mut actual)?;
        assert_eq!(expected, actual);
        Ok(())
    }

    #[test]
    fn test_cast_truncates_tail() -> Result<(), Error> {
        let mut bytes = ByteBuffer::allocate(7)?;
        bytes.put_slice(&[0, 1, 0, 2, 0, 3, 0xff])?;
        let shorts = bytes.cast::<i16>();
        assert_eq!(3, shorts.capacity());
        assert_eq!(vec![1i16, 2, 3], shorts.to_vec()?);
        assert!(shorts.get_at(3).is_err());
        // tail byte still visible at original width
        assert_eq!(0xff, bytes.get_at(6)?);
        assert_eq!(0, bytes.cast::<i64>().capacity());
        Ok(())
    }

    #[test]
    fn test_cast_uses_limit_not_capacity() -> Result<(), Error> {
        let mut ints = IntBuffer::new(4, 1, 3)?;
        ints.put_at(2, -1)?;
        let longs = ints.cast::<i64>();
        assert_eq!(1, longs.capacity());
        let shorts = ints.cast::<u16>();
        assert_eq!(6, shorts.limit());
        assert_eq!(0xffff, shorts.get_at(4)?);
        assert_eq!(0xffff, shorts.get_at(5)?);
        Ok(())
    }

    #[test]
    fn test_cast_aliases_storage() -> Result<(), Error> {
        let mut longs = LongBuffer::allocate(2)?;
        let mut ints = longs.cast::<i32>();
        assert!(ints.shares_storage(&longs));
        ints.put_at(1, 7)?;
        ints.put_at(2, 1)?;
        assert_eq!(7, longs.get_at(0)?);
        assert_eq!(1i64 << 32, longs.get_at(1)?);
        longs.put_at(0, -1)?;
        assert_eq!(-1, ints.get_at(0)?);
        assert_eq!(-1, ints.get_at(1)?);
        Ok(())
    }

    #[test]
    fn test_cast_to_same_width() -> Result<(), Error> {
        let mut buf = IntBuffer::new(4, 3, 4)?;
        let mut same = buf.cast::<i32>();
        assert_eq!((4, 4, 0), (same.capacity(), same.limit(), same.position()));
        same.put(11)?;
        assert_eq!(1, same.position());
        assert_eq!(3, buf.position());
        assert_eq!(11, buf.get_at(0)?);
        // signedness change keeps bits
        let unsigned = buf.cast::<u32>();
        buf.put_at(1, -2)?;
        assert_eq!(0xffff_fffe, unsigned.get_at(1)?);
        Ok(())
    }

    #[test]
    fn test_cast_of_slice() -> Result<(), Error> {
        let mut bytes = ByteBuffer::allocate(10)?;
        bytes.set_position(3)?;
        let sl = bytes.slice();
        let mut ints = sl.cast::<i32>();
        assert_eq!(3, ints.byte_offset());
        assert_eq!(0, ints.array_offset());
        assert_eq!(1, ints.capacity());
        ints.put(0x0a0b0c0d)?;
        assert_eq!(0x0a, bytes.get_at(3)?);
        assert_eq!(0x0d, bytes.get_at(6)?);
        Ok(())
    }

    #[test]
    fn test_cast_read_only_is_sticky() -> Result<(), Error> {
        let buf = DoubleBuffer::allocate(2)?.as_read_only();
        let mut bytes = buf.cast::<u8>();
        assert!(bytes.is_read_only());
        assert_eq!(Err(Error::ReadOnly), bytes.put(1));
        let mut back = bytes.cast::<f64>();
        assert!(back.is_read_only());
        assert_eq!(Err(Error::ReadOnly), back.put_at(0, 1.0));
        assert_eq!(Err(Error::ReadOnly), back.slice().put(1.0));
        Ok(())
    }

    #[test]
    fn test_cast_of_unbacked() {
        let buf = IntBuffer::unbacked();
        let bytes = buf.cast::<u8>();
        assert!(!bytes.is_backed());
        assert_eq!(0, bytes.capacity());
    }

    #[test]
    fn test_get_put_as_relative() -> Result<(), Error> {
        let mut floats = FloatBuffer::allocate(4)?;
        floats.put_as(0x1122334455667788u64)?;
        // an 8-byte value covers two float elements
        assert_eq!(2, floats.position());
        floats.put_as(7u8)?;
        assert_eq!(3, floats.position());
        assert_eq!(Err(Error::BufferOverflow), floats.put_as(1.0f64));
        assert_eq!(3, floats.position());
        floats.flip();
        assert_eq!(0x1122334455667788u64, floats.get_as()?);
        assert_eq!(7u8, floats.get_as()?);
        assert_eq!(Err(Error::BufferUnderflow), floats.get_as::<u8>());
        Ok(())
    }

    #[test]
    fn test_get_put_as_absolute() -> Result<(), Error> {
        let mut bytes = ByteBuffer::allocate(8)?;
        bytes.put_as_at(1, 0x0102u16)?;
        assert_eq!(0, bytes.position());
        assert_eq!(1, bytes.get_at(1)?);
        assert_eq!(2, bytes.get_at(2)?);
        assert_eq!(0x00010200u32, bytes.get_as_at(0)?);
        assert!(matches!(bytes.get_as_at::<u64>(1), Err(Error::IndexOutOfBound(_))));
        assert!(matches!(bytes.put_as_at(7, 1u16), Err(Error::IndexOutOfBound(_))));
        let mut ro = bytes.as_read_only();
        assert_eq!(Err(Error::ReadOnly), ro.put_as_at(0, 1u32));
        assert_eq!(Err(Error::ReadOnly), ro.put_as(1u32));
        Ok(())
    }

    #[test]
    fn test_get_put_as_wrapped_storage() -> Result<(), Error> {
        let storage = Storage::from(vec![0u8; 16]);
        let mut doubles = DoubleBuffer::wrap(&storage, 0, 2)?;
        doubles.put_as_at(1, 1.0f32)?;
        assert_eq!(&1.0f32.to_be_bytes()[..], &storage.to_vec()[8..12]);
        Ok(())
    }

    #[test]
    fn test_cast_round_trip_every_width_pair() -> Result<(), Error> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        // odd length leaves a partial element at every width above 1
        let pattern: Vec<u8> = (0..67).map(|_| rng.gen()).collect();
        macro_rules! check_from {
            ($src:ty) => {
                check_round_trip::<$src, u8>(&pattern)?;
                check_round_trip::<$src, i16>(&pattern)?;
                check_round_trip::<$src, u32>(&pattern)?;
                check_round_trip::<$src, f32>(&pattern)?;
                check_round_trip::<$src, i64>(&pattern)?;
                check_round_trip::<$src, f64>(&pattern)?;
            };
        }
        check_from!(u8);
        check_from!(i8);
        check_from!(u16);
        check_from!(i16);
        check_from!(i32);
        check_from!(f32);
        check_from!(u64);
        check_from!(f64);
        Ok(())
    }

    /// Decode bytes of a `T` view as `U`, encode the values into fresh
    /// storage, and check both widths see the original bytes.
    fn check_round_trip<T: ByteRepr, U: ByteRepr>(pattern: &[u8]) -> Result<(), Error> {
        let mut bytes = ByteBuffer::allocate(pattern.len())?;
        bytes.put_slice(pattern)?;
        let src = bytes.cast::<T>();
        assert_eq!(pattern.len() / T::WIDTH, src.capacity());
        let values = src.cast::<U>().to_vec()?;
        let n_u8 = src.capacity() * T::WIDTH / U::WIDTH * U::WIDTH;
        assert_eq!(n_u8 / U::WIDTH, values.len());

        let mut out = Buffer::<U>::allocate(values.len())?;
        out.put_slice(&values)?;
        assert_eq!(&pattern[..n_u8], &out.cast::<u8>().to_vec()?[..]);
        let mut reference = vec![0u8; n_u8];
        U::memcpy(&values, &mut reference);
        assert_eq!(&pattern[..n_u8], &reference[..]);

        // back to source width, compared by bytes so NaN bits are kept
        let back = out.cast::<T>().to_vec()?;
        let mut image = vec![0u8; back.len() * T::WIDTH];
        T::memcpy(&back, &mut image);
        assert_eq!(&pattern[..image.len()], &image[..]);
        Ok(())
    }
}
