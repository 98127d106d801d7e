//! PE container access for .NET test binaries.
//!
//! A compiled .NET test binary is a Portable Executable whose CLR runtime header points
//! at the ECMA-335 metadata. This module provides [`File`], a parsed PE over a pluggable
//! [`Backend`] (memory-mapped file or in-memory buffer), with RVA translation and
//! bounds-checked data access. The companion Portable PDB is a bare metadata image and
//! never goes through this type.
//!
//! # Key Components
//! - [`File`] - Parsed PE with .NET validation and address translation
//! - [`Backend`] - Trait over the data source (disk or memory)
//! - [`parser::Parser`] - Cursor used by the metadata decoding layers
//! - [`io`] - Bounds-checked little-endian primitives

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Backend trait for file data sources.
///
/// Abstracts over the source of PE data, allowing both in-memory and on-disk
/// representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - The starting offset within the data
    /// * `len` - The length of the slice in bytes
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded .NET PE file.
///
/// Wraps the parsed PE and provides access to the CLR runtime header location, section
/// table based address translation, and raw data. Loading validates that the binary is
/// managed: a PE without a CLR runtime header directory is rejected up front.
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Loads a PE file from the given path.
    ///
    /// The file is memory-mapped for efficient access.
    ///
    /// # Arguments
    /// * `file` - Path to the PE file on disk
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read or opened
    /// - The file is not a valid PE format
    /// - The PE file does not contain .NET metadata (missing CLR runtime header)
    /// - The file is empty
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Arguments
    /// * `data` - The bytes of the PE file
    ///
    /// # Errors
    /// Returns an error if the buffer is empty, the data is not a valid PE, or the PE
    /// has no CLR runtime header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    /// Internal loader for any backend.
    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let data = data.as_ref();
            match PE::parse(data.data()) {
                Ok(pe) => match pe.header.optional_header {
                    Some(optional_header) => {
                        if optional_header
                            .data_directories
                            .get_clr_runtime_header()
                            .is_none()
                        {
                            Err(malformed_error!(
                                "File does not have a CLR runtime header directory"
                            ))
                        } else {
                            Ok(pe)
                        }
                    }
                    None => Err(malformed_error!("File does not have an OptionalHeader")),
                },
                Err(error) => Err(GoblinErr(error)),
            }
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the RVA and size (in bytes) of the CLR runtime header.
    ///
    /// # Panics
    /// Panics if the CLR runtime header is missing, which `load` has already ruled out.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            let optional_header = pe.header.optional_header.unwrap();
            let clr_dir = optional_header
                .data_directories
                .get_clr_runtime_header()
                .unwrap();

            (clr_dir.virtual_address as usize, clr_dir.size as usize)
        })
    }

    /// Returns the raw data of the loaded file.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a slice of the file data at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - The offset to start the slice from
    /// * `len` - The length of the slice
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Converts a relative virtual address (RVA) to a file offset.
    ///
    /// Walks the section table and maps the RVA through the containing section's raw
    /// data pointer.
    ///
    /// # Arguments
    /// * `rva` - The RVA to convert
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the RVA falls outside every section or a
    /// section's virtual range overflows.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        self.with_pe(|pe| {
            let rva_u32 = u32::try_from(rva)
                .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
