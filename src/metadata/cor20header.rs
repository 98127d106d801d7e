//! CLR 2.0 (Cor20) header parsing.
//!
//! The [`Cor20Header`] sits at the start of the `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR`
//! data directory and locates the ECMA-335 metadata inside a .NET PE image.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The CLR runtime header of a .NET PE image.
///
/// Only the fields the metadata locator needs are retained; the trailing resource,
/// strong-name and vtable-fixup directories are validated for shape and discarded.
pub struct Cor20Header {
    /// Size of header in bytes, always 72
    pub cb: u32,
    /// The minimum major version of runtime required to run this program
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// Flags describing this runtime image
    pub flags: u32,
    /// Token for the `MethodDef` or File of the entry point for the image
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Create a [`Cor20Header`] from a sequence of bytes.
    ///
    /// # Arguments
    /// * `data` - The byte slice from which this object shall be created
    ///
    /// # Errors
    /// Returns an error if the data is too short to contain a valid CLR header, or if
    /// any field validation fails per ECMA-335 II.25.3.3.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        const VALID_FLAGS: u32 = 0x0000_001F;

        if data.len() < 72 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let flags = parser.read_le::<u32>()?;
        if flags & !VALID_FLAGS != 0 {
            return Err(malformed_error!(
                "Invalid CLR flags: 0x{:08X} contains undefined bits",
                flags
            ));
        }

        let entry_point_token = parser.read_le::<u32>()?;

        // Resource, strong-name and vtable-fixup directories must come in
        // matched rva/size pairs; the reader does not use their contents.
        for directory in ["Resources", "StrongNameSignature", "VTableFixups"] {
            let rva = parser.read_le::<u32>()?;
            let size = parser.read_le::<u32>()?;
            if (rva == 0) != (size == 0) {
                return Err(malformed_error!("{} directory values are invalid", directory));
            }

            // Skip the reserved CodeManagerTable pair between strong name and vtable fixups
            if directory == "StrongNameSignature" {
                let reserved_rva = parser.read_le::<u32>()?;
                let reserved_size = parser.read_le::<u32>()?;
                if reserved_rva != 0 || reserved_size != 0 {
                    return Err(malformed_error!(
                        "Code Manager Table fields must be zero (reserved)"
                    ));
                }
            }
        }

        let export_address_table_jmp_rva = parser.read_le::<u32>()?;
        let export_address_table_jmp_size = parser.read_le::<u32>()?;
        if export_address_table_jmp_rva != 0 || export_address_table_jmp_size != 0 {
            return Err(malformed_error!(
                "Export Address Table Jump fields must be zero (reserved)"
            ));
        }

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}
