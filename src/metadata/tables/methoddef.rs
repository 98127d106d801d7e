//! `MethodDef` table rows.
//!
//! One row per method defined in the assembly. The navigation core needs only the name
//! and the flags that mark constructors; rows belong to the `TypeDef` whose
//! `method_list` range covers their rid.
//!
//! # Reference
//! - [ECMA-335 II.22.26](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

bitflags! {
    /// `MethodAttributes` flags from the `MethodDef` row.
    ///
    /// Only the subset needed to recognize runtime-special members such as `.ctor` and
    /// `.cctor` is named.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct MethodAttributes: u16 {
        /// Method is special; the name describes how
        const SPECIAL_NAME = 0x0800;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x1000;
    }
}

/// Raw row of the `MethodDef` table (id 0x06).
pub struct MethodDefRaw {
    /// Row identifier (1-based) within the table
    pub rid: u32,
    /// Metadata token for this row
    pub token: Token,
    /// Byte offset of this row within the table data
    pub offset: usize,
    /// RVA of the method body, 0 for abstract and extern methods
    pub rva: u32,
    /// `MethodImplAttributes` bitmask
    pub impl_flags: u16,
    /// `MethodAttributes` bitmask
    pub flags: u16,
    /// Offset into the `#Strings` heap for the method name
    pub name: u32,
    /// Offset into the `#Blob` heap for the method signature
    pub signature: u32,
    /// 1-based index into `Param` where this method's parameters begin
    pub param_list: u32,
}

impl MethodDefRaw {
    /// True when the row is a constructor (`.ctor`) or type initializer (`.cctor`).
    ///
    /// Both carry `RTSpecialName`, which ordinary test methods never do.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        MethodAttributes::from_bits_truncate(self.flags)
            .contains(MethodAttributes::RT_SPECIAL_NAME | MethodAttributes::SPECIAL_NAME)
    }
}

impl RowReadable for MethodDefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* rva */        4 +
            /* impl_flags */ 2 +
            /* flags */      2 +
            /* name */       sizes.str_bytes() +
            /* signature */  sizes.blob_bytes() +
            /* param_list */ sizes.table_index_bytes(TableId::Param),
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;

        Ok(MethodDefRaw {
            rid,
            token: Token::new(0x0600_0000 + rid),
            offset: offset_org,
            rva: read_le_at_dyn(data, offset, true)?,
            impl_flags: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
        })
    }
}
