//! `MethodDebugInformation` table rows.
//!
//! The Portable PDB table linking methods to their sequence points. Row N describes the
//! method with `MethodDef` rid N in the corresponding assembly; a row with both columns
//! zero means the method has no debug information.
//!
//! # Reference
//! - [Portable PDB: MethodDebugInformation table](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#methoddebuginformation-table-0x31)

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// Raw row of the Portable PDB `MethodDebugInformation` table (id 0x31).
pub struct MethodDebugInformationRaw {
    /// Row identifier (1-based) within the table, equal to the `MethodDef` rid
    pub rid: u32,
    /// Metadata token for this row
    pub token: Token,
    /// Byte offset of this row within the table data
    pub offset: usize,
    /// 1-based `Document` index, 0 when the method spans documents or has no points
    pub document: u32,
    /// Offset into the `#Blob` heap for the sequence-points record, 0 if none
    pub sequence_points: u32,
}

impl RowReadable for MethodDebugInformationRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* document */        sizes.table_index_bytes(TableId::Document) +
            /* sequence_points */ sizes.blob_bytes(),
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;

        Ok(MethodDebugInformationRaw {
            rid,
            token: Token::new(0x3100_0000 + rid),
            offset: offset_org,
            document: read_le_at_dyn(data, offset, sizes.is_large(TableId::Document))?,
            sequence_points: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
