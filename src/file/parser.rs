//! Cursor-based byte stream parser for metadata decoding.
//!
//! [`Parser`] maintains a position within a byte slice and provides bounds-checked reads
//! of primitives plus the ECMA-335 compressed integer encodings (II.23.2) that the
//! blob heap and the sequence-points format rely on.

use crate::{file::io::{read_le_at, LeRead}, Result};

/// A bounds-checked cursor over a byte slice.
///
/// Used for decoding metadata blobs: document names, sequence points, and any other
/// structure that mixes fixed-width and compressed-integer fields.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] over a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the current position is before the end of the data.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Read a primitive of type `T` in little-endian byte order, advancing the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn read_le<T: LeRead>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// One-byte values use `0xxxxxxx`, two-byte values `10xxxxxx x`, four-byte values
    /// `110xxxxx x y z`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for an invalid leading byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read a compressed signed integer as defined in ECMA-335 II.23.2.
    ///
    /// The value is rotated so the sign lands in the least significant bit, then
    /// compressed like an unsigned integer; decoding must sign-extend according to the
    /// width of the encoding (6, 13 or 28 value bits).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for an invalid leading byte.
    #[allow(clippy::cast_possible_wrap)]
    pub fn read_compressed_int(&mut self) -> Result<i32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 6 value bits
        if (first_byte & 0x80) == 0 {
            let unsigned = u32::from(first_byte);
            let mut value = (unsigned >> 1) as i32;
            if (unsigned & 1) != 0 {
                value |= 0xFFFF_FFC0_u32 as i32;
            }
            return Ok(value);
        }

        // 2-byte encoding: 13 value bits
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let unsigned = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            let mut value = (unsigned >> 1) as i32;
            if (unsigned & 1) != 0 {
                value |= 0xFFFF_E000_u32 as i32;
            }
            return Ok(value);
        }

        // 4-byte encoding: 28 value bits
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let unsigned = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            let mut value = (unsigned >> 1) as i32;
            if (unsigned & 1) != 0 {
                value |= 0xF000_0000_u32 as i32;
            }
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed int - {}", first_byte))
    }
}
