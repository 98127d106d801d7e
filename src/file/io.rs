//! Bounds-checked little-endian primitives for metadata parsing.
//!
//! All table and stream readers in this crate go through these helpers rather than
//! indexing slices directly, so a truncated or hostile file surfaces as
//! [`crate::Error::OutOfBounds`] instead of a panic.

use crate::{Error::OutOfBounds, Result};

/// Types that can be decoded from a fixed-size little-endian byte array.
///
/// Implemented for the unsigned and signed integer widths the ECMA-335 physical
/// format uses. The associated `Bytes` array ties the decode to `size_of::<T>()`.
pub trait LeRead: Sized {
    /// The fixed-size byte array this type decodes from
    type Bytes: for<'a> TryFrom<&'a [u8]>;

    /// Decode from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_le_read {
    ($($t:ty),*) => {
        $(
            impl LeRead for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$t>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_le_read!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Read a value of type `T` in little-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `size_of::<T>()`.
pub fn read_le<T: LeRead>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value of type `T` in little-endian byte order at `offset`, advancing the
/// offset by the number of bytes consumed.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes at `offset`.
pub fn read_le_at<T: LeRead>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Read either a 2-byte or a 4-byte index in little-endian byte order, promoting to
/// `u32`.
///
/// Metadata tables store heap and table indices as 2 or 4 bytes depending on heap
/// sizes and row counts; the decision is made once per image and passed in as
/// `is_large`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes at `offset`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_le_basic() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_le::<u16>(&data).unwrap(), 0x0201);
        assert_eq!(read_le::<u32>(&data).unwrap(), 0x0403_0201);
    }

    #[test]
    fn read_le_at_advances() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&data, &mut offset).unwrap(), 0x0201);
        assert_eq!(offset, 2);
        assert_eq!(read_le_at::<u16>(&data, &mut offset).unwrap(), 0x0403);
        assert_eq!(offset, 4);
        assert!(read_le_at::<u8>(&data, &mut offset).is_err());
    }

    #[test]
    fn read_le_at_dyn_sizes() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut offset = 0;
        assert_eq!(read_le_at_dyn(&data, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(offset, 2);

        let mut offset = 0;
        assert_eq!(
            read_le_at_dyn(&data, &mut offset, true).unwrap(),
            0x0403_0201
        );
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_le_out_of_bounds() {
        let data = [0x01];
        assert!(read_le::<u32>(&data).is_err());
        assert!(matches!(read_le::<u16>(&data), Err(OutOfBounds)));
    }
}
