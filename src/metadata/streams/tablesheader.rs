//! Tables stream (`#~`).
//!
//! The compressed metadata tables stream: a header with version, heap width flags and
//! the `valid`/`sorted` bitmasks, the row count of each present table, then the table
//! rows concatenated back to back with no padding. [`TablesHeader::from`] walks the
//! concatenation once with the row sizes derived from [`TableInfo`], recording where
//! each present table starts, so typed access afterwards is just slicing.
//!
//! # References
//! - [ECMA-335 II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)
//! - [Portable PDB Format](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md)

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{
        table_row_size, MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef, TABLE_SLOTS,
    },
    Error::OutOfBounds,
    Result,
};

/// Bitmask of all table ids this reader understands.
fn known_tables_mask() -> u64 {
    TableId::iter().fold(0_u64, |mask, id| mask | (1_u64 << id as usize))
}

/// Parsed view of the `#~` stream.
pub struct TablesHeader<'a> {
    /// Major version of the table schema, currently 2
    pub major_version: u8,
    /// Minor version of the table schema, currently 0
    pub minor_version: u8,
    /// Bitmask of the tables present in this stream
    pub valid: u64,
    /// Bitmask of the tables that are sorted
    pub sorted: u64,
    /// Row counts and index width decisions for this image
    pub info: TableInfoRef,
    /// Raw data and row count per present table, indexed by table id
    table_slices: Vec<Option<(&'a [u8], u32)>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse a [`TablesHeader`] from the `#~` stream bytes.
    ///
    /// # Arguments
    /// * `data` - The stream contents, starting at the stream header
    ///
    /// # Errors
    /// Returns an error if the header is truncated, announces a table this reader does
    /// not know, or the announced rows exceed the stream size.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        Self::from_with_external(data, &[])
    }

    /// Parse a [`TablesHeader`], merging row counts of tables that live in another
    /// image.
    ///
    /// A standalone Portable PDB stores `MethodDebugInformation` rows whose indexes
    /// refer to the assembly's type-system tables; their row counts come from the
    /// `#Pdb` stream and must participate in index width decisions here.
    ///
    /// # Arguments
    /// * `data` - The stream contents, starting at the stream header
    /// * `external` - Row counts for tables not present in this stream
    ///
    /// # Errors
    /// Returns an error if the header is truncated, announces a table this reader does
    /// not know, or the announced rows exceed the stream size.
    pub fn from_with_external(
        data: &'a [u8],
        external: &[(TableId, u32)],
    ) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid = read_le::<u64>(&data[8..])?;
        if valid & !known_tables_mask() != 0 {
            return Err(malformed_error!(
                "Tables stream announces unknown tables - valid mask {:#018x}",
                valid
            ));
        }

        let info = Arc::new(TableInfo::new_with_external(data, valid, external)?);

        let mut table_slices: Vec<Option<(&'a [u8], u32)>> = vec![None; TABLE_SLOTS];
        let mut offset = 24 + (valid.count_ones() as usize) * 4;
        for table_id in TableId::iter() {
            if (valid & (1_u64 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = info.get(table_id).rows;
            let table_size = row_count as usize * table_row_size(table_id, &info) as usize;
            let Some(table_end) = offset.checked_add(table_size) else {
                return Err(OutOfBounds);
            };
            if table_end > data.len() {
                return Err(OutOfBounds);
            }

            table_slices[table_id as usize] = Some((&data[offset..table_end], row_count));
            offset = table_end;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            table_slices,
        })
    }

    /// Returns the number of rows in the given table, 0 if absent.
    #[must_use]
    pub fn row_count(&self, table_id: TableId) -> u32 {
        match self.table_slices[table_id as usize] {
            Some((_, rows)) => rows,
            None => 0,
        }
    }

    /// Returns a typed view of the given table, `None` if the table is absent.
    #[must_use]
    pub fn table<T: RowReadable>(&self, table_id: TableId) -> Option<MetadataTable<'a, T>> {
        let (table_data, rows) = self.table_slices[table_id as usize]?;
        MetadataTable::new(table_data, rows, self.info.clone()).ok()
    }
}
