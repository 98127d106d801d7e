//! `NestedClass` table rows.
//!
//! Records which `TypeDef` is lexically nested inside which other `TypeDef`. Walking
//! the enclosing chain turns `Inner` into `Namespace.Outer+Inner`, the fully qualified
//! form the runtime reports for nested test classes.
//!
//! # Reference
//! - [ECMA-335 II.22.32](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// Raw row of the `NestedClass` table (id 0x29).
pub struct NestedClassRaw {
    /// Row identifier (1-based) within the table
    pub rid: u32,
    /// Metadata token for this row
    pub token: Token,
    /// Byte offset of this row within the table data
    pub offset: usize,
    /// 1-based `TypeDef` index of the nested type
    pub nested_class: u32,
    /// 1-based `TypeDef` index of the enclosing type
    pub enclosing_class: u32,
}

impl RowReadable for NestedClassRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.table_index_bytes(TableId::TypeDef)) * 2
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;
        let is_large = sizes.is_large(TableId::TypeDef);

        Ok(NestedClassRaw {
            rid,
            token: Token::new(0x2900_0000 + rid),
            offset: offset_org,
            nested_class: read_le_at_dyn(data, offset, is_large)?,
            enclosing_class: read_le_at_dyn(data, offset, is_large)?,
        })
    }
}
