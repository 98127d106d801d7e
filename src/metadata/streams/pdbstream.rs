//! Portable PDB stream (`#Pdb`).
//!
//! Present only in standalone symbol files. Carries the 20-byte PDB id that ties the
//! symbol file to its assembly, the entry point token, and the row counts of the
//! type-system tables in the referencing assembly, which size the cross-image indexes
//! used by the local debug tables.
//!
//! # Reference
//! - [Portable PDB: #Pdb stream](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#pdb-stream)

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le_at,
    metadata::{tables::TableId, token::Token},
    Error::OutOfBounds,
    Result,
};

/// Mask of the table ids a `#Pdb` stream may reference: the type-system tables,
/// 0x00 through 0x2C.
const TYPE_SYSTEM_TABLES_MASK: u64 = (1_u64 << 0x2D) - 1;

/// Parsed view of the `#Pdb` stream of a standalone Portable PDB.
pub struct PdbStream {
    /// Unique id tying this symbol file to a build of its assembly
    pub id: [u8; 20],
    /// `MethodDef` token of the entry point, 0 for libraries
    pub entry_point: Token,
    /// Bitmask of the type-system tables present in the referencing assembly
    pub referenced_tables: u64,
    /// Row count per referenced table, in table id order
    type_system_rows: Vec<(TableId, u32)>,
}

impl PdbStream {
    /// Parse a [`PdbStream`] from the stream bytes.
    ///
    /// # Arguments
    /// * `data` - The stream contents
    ///
    /// # Errors
    /// Returns an error if the stream is truncated or references non-type-system
    /// tables.
    pub fn from(data: &[u8]) -> Result<PdbStream> {
        if data.len() < 32 {
            return Err(OutOfBounds);
        }

        let mut id = [0_u8; 20];
        id.copy_from_slice(&data[..20]);

        let mut offset = 20;
        let entry_point = Token::new(read_le_at::<u32>(data, &mut offset)?);
        let referenced_tables = {
            let low = u64::from(read_le_at::<u32>(data, &mut offset)?);
            let high = u64::from(read_le_at::<u32>(data, &mut offset)?);
            low | (high << 32)
        };

        if referenced_tables & !TYPE_SYSTEM_TABLES_MASK != 0 {
            return Err(malformed_error!(
                "#Pdb stream references non-type-system tables - {:#018x}",
                referenced_tables
            ));
        }

        let mut type_system_rows = Vec::with_capacity(referenced_tables.count_ones() as usize);
        for table_id in TableId::iter() {
            if (referenced_tables & (1_u64 << table_id as usize)) == 0 {
                continue;
            }

            type_system_rows.push((table_id, read_le_at::<u32>(data, &mut offset)?));
        }

        Ok(PdbStream {
            id,
            entry_point,
            referenced_tables,
            type_system_rows,
        })
    }

    /// Row counts of the type-system tables in the referencing assembly.
    #[must_use]
    pub fn type_system_rows(&self) -> &[(TableId, u32)] {
        &self.type_system_rows
    }
}
