//! Stream header for metadata streams.
//!
//! Each entry in the metadata root's stream directory names one stream and gives its
//! offset and size relative to the root. Portable PDB images add the `#Pdb` stream to
//! the set an assembly image carries.
//!
//! # Reference
//! - [ECMA-335 II.24.2.2](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// A stream header provides the name, position and length of one metadata stream. The
/// length of the structure is not fixed but depends on the length of its name field, a
/// variable length null-terminated string padded to a 4-byte boundary.
pub struct StreamHeader {
    /// Offset of the stream, relative to the start of the metadata root
    pub offset: u32,
    /// Size of this stream in bytes, shall be a multiple of 4
    pub size: u32,
    /// Name of the stream, max 32 characters including the terminator
    pub name: String,
}

impl StreamHeader {
    /// Create a [`StreamHeader`] from a sequence of bytes.
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too short or the stream name is not one of the
    /// ECMA-335 / Portable PDB stream names.
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let mut name = String::with_capacity(32);
        for counter in 0..std::cmp::min(32, data.len() - 8) {
            let name_char = read_le::<u8>(&data[8 + counter..])?;
            if name_char == 0 {
                break;
            }

            name.push(char::from(name_char));
        }

        // `#-` is the uncompressed (EnC) tables stream; recognized here so the tables
        // reader can reject it with a distinct error instead of "unknown stream".
        if !["#Strings", "#US", "#Blob", "#GUID", "#~", "#-", "#Pdb"]
            .iter()
            .any(|valid_name| name == *valid_name)
        {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }
}
