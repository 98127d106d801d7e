//! GUID heap (`#GUID`).
//!
//! A sequence of 128-bit GUIDs referenced by 1-based index from metadata tables. In a
//! Portable PDB the `Document` table's `language` and `hash_algorithm` columns point
//! here.
//!
//! # Reference
//! - [ECMA-335 II.24.2.5](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{Error::OutOfBounds, Result};

/// `#GUID` is a heap containing a sequence of 128-bit GUIDs.
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Create a [`Guid`] object from a sequence of bytes.
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too small to contain a single GUID.
    pub fn from(data: &'a [u8]) -> Result<Guid<'a>> {
        if data.len() < 16 {
            return Err(malformed_error!("Data for #GUID heap is too small"));
        }

        Ok(Guid { data })
    }

    /// Returns the GUID at the specified 1-based index.
    ///
    /// ## Arguments
    /// * `index` - The index of the GUID to be accessed (comes from metadata tables)
    ///
    /// # Errors
    /// Returns an error if the index is zero or out of bounds.
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index < 1 {
            return Err(OutOfBounds);
        }

        let offset = (index - 1) * 16;
        let Some(end) = offset.checked_add(16) else {
            return Err(OutOfBounds);
        };

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(&self.data[offset..end]);

        Ok(uguid::Guid::from_bytes(buffer))
    }
}
