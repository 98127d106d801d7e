//! `Document` table rows.
//!
//! One row per source document referenced by a Portable PDB. The document name is not a
//! plain string: its blob holds a separator byte followed by compressed blob-heap
//! indexes of the path parts, which [`DocumentRaw::decode_name`] reassembles.
//!
//! # Reference
//! - [Portable PDB: Document table](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#document-table-0x30)

use crate::{
    file::{io::read_le_at_dyn, parser::Parser},
    metadata::{
        streams::Blob,
        tables::{RowReadable, TableInfoRef},
        token::Token,
    },
    Result,
};

/// Raw row of the Portable PDB `Document` table (id 0x30).
pub struct DocumentRaw {
    /// Row identifier (1-based) within the table
    pub rid: u32,
    /// Metadata token for this row
    pub token: Token,
    /// Byte offset of this row within the table data
    pub offset: usize,
    /// Offset into the `#Blob` heap for the encoded document name
    pub name: u32,
    /// 1-based `#GUID` heap index of the hash algorithm, 0 if none
    pub hash_algorithm: u32,
    /// Offset into the `#Blob` heap for the document hash, 0 if none
    pub hash: u32,
    /// 1-based `#GUID` heap index of the source language, 0 if unknown
    pub language: u32,
}

impl DocumentRaw {
    /// Decodes the document name blob into the full source path.
    ///
    /// The blob starts with the separator character (a single byte, or 0 when the name
    /// has one part), followed by compressed unsigned blob-heap indexes of the UTF-8
    /// path parts. An index of 0 stands for an empty part, which a rooted path like
    /// `/home/user/Calc.cs` starts with.
    ///
    /// # Errors
    /// Returns an error if the blob is missing, a part index cannot be read, or a part
    /// is not valid UTF-8.
    pub fn decode_name(&self, blob: &Blob) -> Result<String> {
        let name_blob = blob.get(self.name as usize)?;
        if name_blob.is_empty() {
            return Err(malformed_error!(
                "Document name blob is empty - token {}",
                self.token
            ));
        }

        let separator = name_blob[0];
        if separator > 0x7F {
            return Err(malformed_error!(
                "Document name separator is not ASCII - {:#04x}",
                separator
            ));
        }

        let mut parser = Parser::new(&name_blob[1..]);
        let mut parts = Vec::new();
        while parser.has_more_data() {
            let part_index = parser.read_compressed_uint()? as usize;
            if part_index == 0 {
                parts.push("");
                continue;
            }

            let part_bytes = blob.get(part_index)?;
            match std::str::from_utf8(part_bytes) {
                Ok(part) => parts.push(part),
                Err(_) => {
                    return Err(malformed_error!(
                        "Document name part is not valid UTF-8 - blob offset {}",
                        part_index
                    ))
                }
            }
        }

        if separator == 0 {
            Ok(parts.concat())
        } else {
            let mut separator_str = [0_u8; 1];
            separator_str[0] = separator;
            Ok(parts.join(std::str::from_utf8(&separator_str).map_err(|_| {
                malformed_error!("Document name separator is not valid UTF-8")
            })?))
        }
    }
}

impl RowReadable for DocumentRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* name */           sizes.blob_bytes() +
            /* hash_algorithm */ sizes.guid_bytes() +
            /* hash */           sizes.blob_bytes() +
            /* language */       sizes.guid_bytes(),
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;

        Ok(DocumentRaw {
            rid,
            token: Token::new(0x3000_0000 + rid),
            offset: offset_org,
            name: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            hash_algorithm: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            hash: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            language: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{MetadataTable, TableId, TableInfo};

    #[test]
    fn crafted_short() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x01, // name
            0x02, 0x02, // hash_algorithm
            0x03, 0x03, // hash
            0x04, 0x04, // language
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Document, 1)],
            false,
            false,
            false,
        ));

        let table = MetadataTable::<DocumentRaw>::new(&data, 1, sizes).unwrap();
        let row = table.get(1).unwrap();

        assert_eq!(row.rid, 1);
        assert_eq!(row.token.value(), 0x3000_0001);
        assert_eq!(row.name, 0x0101);
        assert_eq!(row.hash_algorithm, 0x0202);
        assert_eq!(row.hash, 0x0303);
        assert_eq!(row.language, 0x0404);
    }

    #[test]
    fn crafted_long() {
        #[rustfmt::skip]
        let data = [
            0x01, 0x01, 0x01, 0x01, // name
            0x02, 0x02, 0x02, 0x02, // hash_algorithm
            0x03, 0x03, 0x03, 0x03, // hash
            0x04, 0x04, 0x04, 0x04, // language
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Document, 1)],
            true,
            true,
            true,
        ));

        let table = MetadataTable::<DocumentRaw>::new(&data, 1, sizes).unwrap();
        let row = table.get(1).unwrap();

        assert_eq!(row.name, 0x0101_0101);
        assert_eq!(row.hash_algorithm, 0x0202_0202);
        assert_eq!(row.hash, 0x0303_0303);
        assert_eq!(row.language, 0x0404_0404);
    }

    fn document_with_name(name: u32) -> DocumentRaw {
        DocumentRaw {
            rid: 1,
            token: Token::new(0x3000_0001),
            offset: 0,
            name,
            hash_algorithm: 0,
            hash: 0,
            language: 0,
        }
    }

    #[test]
    fn decode_rooted_path() {
        // heap layout:
        //   1: name blob: '/' separator, parts [0, 6, 10]
        //   6: "src"
        //  10: "Calc.cs"
        #[rustfmt::skip]
        let heap = [
            0x00,
            /*  1 */ 0x04, b'/', 0x00, 0x06, 0x0A,
            /*  6 */ 0x03, b's', b'r', b'c',
            /* 10 */ 0x07, b'C', b'a', b'l', b'c', b'.', b'c', b's',
        ];
        let blob = Blob::from(&heap).unwrap();

        let name = document_with_name(1).decode_name(&blob).unwrap();
        assert_eq!(name, "/src/Calc.cs");
    }

    #[test]
    fn decode_single_part() {
        #[rustfmt::skip]
        let heap = [
            0x00,
            /* 1 */ 0x02, 0x00, 0x04,
            /* 4 */ 0x07, b'C', b'a', b'l', b'c', b'.', b'c', b's',
        ];
        let blob = Blob::from(&heap).unwrap();

        let name = document_with_name(1).decode_name(&blob).unwrap();
        assert_eq!(name, "Calc.cs");
    }

    #[test]
    fn decode_invalid() {
        // empty name blob, and a part index pointing outside the heap
        #[rustfmt::skip]
        let heap = [
            0x00,
            /* 1 */ 0x00,
            /* 2 */ 0x02, b'\\', 0x70,
        ];
        let blob = Blob::from(&heap).unwrap();

        assert!(document_with_name(1).decode_name(&blob).is_err());
        assert!(document_with_name(2).decode_name(&blob).is_err());
    }
}
