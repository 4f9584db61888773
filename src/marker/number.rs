//! marker/number - fixed-width integer fields, big-endian.
//!
//! Every numeric field of a marker goes through these two helpers, so the byte
//! order is the same end to end (embedded 3-byte length, crc, tick, ids).

use byteorder::{BigEndian, ByteOrder};

use crate::error::FormatError;

/// Unsigned integers that can be stored as a fixed-width field.
pub trait FixedWidth: Copy {
    const WIDTH: usize;
    fn from_u64(v: u64) -> Self;
    fn to_u64(self) -> u64;
}

macro_rules! fixed_width {
    ($($t:ty),*) => {$(
        impl FixedWidth for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();
            #[inline]
            fn from_u64(v: u64) -> Self { v as $t }
            #[inline]
            fn to_u64(self) -> u64 { self as u64 }
        }
    )*};
}

fixed_width!(u8, u16, u32, u64);

/// Read the whole of `bytes` (1..=T::WIDTH bytes, most significant first) as `T`.
pub fn read_number<T: FixedWidth>(bytes: &[u8]) -> Result<T, FormatError> {
    if bytes.is_empty() || bytes.len() > T::WIDTH {
        return Err(FormatError::FieldWidth {
            len: bytes.len(),
            max: T::WIDTH,
        });
    }
    Ok(read_field(bytes))
}

/// Header and body fields: offsets and widths are constants that fit `T`.
#[inline]
pub(crate) fn read_field<T: FixedWidth>(bytes: &[u8]) -> T {
    debug_assert!(!bytes.is_empty() && bytes.len() <= T::WIDTH);
    T::from_u64(BigEndian::read_uint(bytes, bytes.len()))
}

/// Write `value` into the first `len` bytes of `dest`, most significant first.
pub fn write_number<T: FixedWidth>(
    dest: &mut [u8],
    value: T,
    len: usize,
) -> Result<(), FormatError> {
    if len == 0 || len > 8 {
        return Err(FormatError::NumberOverflow {
            value: value.to_u64(),
            width: len,
        });
    }
    if dest.len() < len {
        return Err(FormatError::BufferTooSmall {
            len: dest.len(),
            need: len,
        });
    }
    let v = value.to_u64();
    if len < 8 && v >> (len * 8) != 0 {
        return Err(FormatError::NumberOverflow { value: v, width: len });
    }
    BigEndian::write_uint(&mut dest[..len], v, len);
    Ok(())
}
