//! String heap (`#Strings`).
//!
//! Stores the identifier strings (type names, namespaces, method names) that metadata
//! table rows reference by offset, as null-terminated UTF-8.
//!
//! # Reference
//! - [ECMA-335 II.24.2.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::{ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// `#Strings` holds the identifiers referenced from the metadata tables. The heap
/// always starts with a null byte, so offset 0 is the empty string.
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a [`Strings`] object from a sequence of bytes.
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the string heap data is empty or does not start with the
    /// mandatory null byte.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get a view into the string contained at the provided heap offset.
    ///
    /// ## Arguments
    /// * `index` - The offset within the heap to be accessed (comes from metadata tables)
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds, the string is not terminated, or
    /// the data is invalid UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index > self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}
