//! `TypeDef` table rows.
//!
//! One row per type defined in the assembly, carrying its name and namespace as string
//! heap offsets and the start of its contiguous method range in `MethodDef`. The row id
//! doubles as the type's token rid; nesting relationships live in `NestedClass`.
//!
//! # Reference
//! - [ECMA-335 II.22.37](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// Raw row of the `TypeDef` table (id 0x02).
pub struct TypeDefRaw {
    /// Row identifier (1-based) within the table
    pub rid: u32,
    /// Metadata token for this row
    pub token: Token,
    /// Byte offset of this row within the table data
    pub offset: usize,
    /// `TypeAttributes` bitmask
    pub flags: u32,
    /// Offset into the `#Strings` heap for the type name
    pub type_name: u32,
    /// Offset into the `#Strings` heap for the namespace, 0 for the global namespace
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type, kept raw
    pub extends: u32,
    /// 1-based index into `Field` where this type's fields begin
    pub field_list: u32,
    /// 1-based index into `MethodDef` where this type's methods begin
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */          4 +
            /* type_name */      sizes.str_bytes() +
            /* type_namespace */ sizes.str_bytes() +
            /* extends */        sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef) +
            /* field_list */     sizes.table_index_bytes(TableId::Field) +
            /* method_list */    sizes.table_index_bytes(TableId::MethodDef),
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;

        Ok(TypeDefRaw {
            rid,
            token: Token::new(0x0200_0000 + rid),
            offset: offset_org,
            flags: read_le_at_dyn(data, offset, true)?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            extends: read_le_at_dyn(
                data,
                offset,
                sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef) == 4,
            )?,
            field_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_short() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x01, 0x01, 0x01, // flags
            0x02, 0x02,             // type_name
            0x03, 0x03,             // type_namespace
            0x04, 0x04,             // extends
            0x05, 0x05,             // field_list
            0x06, 0x06,             // method_list
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[
                (TableId::TypeDef, 1),
                (TableId::Field, 10),
                (TableId::MethodDef, 10),
            ],
            false,
            false,
            false,
        ));

        let table = MetadataTable::<TypeDefRaw>::new(&data, 1, sizes).unwrap();
        let row = table.get(1).unwrap();

        assert_eq!(row.rid, 1);
        assert_eq!(row.token.value(), 0x0200_0001);
        assert_eq!(row.flags, 0x0101_0101);
        assert_eq!(row.type_name, 0x0202);
        assert_eq!(row.type_namespace, 0x0303);
        assert_eq!(row.extends, 0x0404);
        assert_eq!(row.field_list, 0x0505);
        assert_eq!(row.method_list, 0x0606);
    }

    #[test]
    fn crafted_long() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x01, 0x01, 0x01, // flags
            0x02, 0x02, 0x02, 0x02, // type_name
            0x03, 0x03, 0x03, 0x03, // type_namespace
            0x04, 0x04, 0x04, 0x04, // extends
            0x05, 0x05, 0x05, 0x05, // field_list
            0x06, 0x06, 0x06, 0x06, // method_list
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[
                (TableId::TypeDef, u16::MAX as u32 + 3),
                (TableId::Field, u16::MAX as u32 + 3),
                (TableId::MethodDef, u16::MAX as u32 + 3),
            ],
            true,
            true,
            true,
        ));

        let table = MetadataTable::<TypeDefRaw>::new(&data, 1, sizes).unwrap();
        let row = table.get(1).unwrap();

        assert_eq!(row.token.value(), 0x0200_0001);
        assert_eq!(row.type_name, 0x0202_0202);
        assert_eq!(row.type_namespace, 0x0303_0303);
        assert_eq!(row.extends, 0x0404_0404);
        assert_eq!(row.field_list, 0x0505_0505);
        assert_eq!(row.method_list, 0x0606_0606);
    }
}
