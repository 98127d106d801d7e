//! Portable PDB symbol file access.
//!
//! A standalone `.pdb` produced for a .NET assembly is a bare ECMA-335 metadata image:
//! no PE wrapper, just the `BSJB` root with the debug tables and the `#Pdb` stream.
//! [`PortablePdb`] parses it once into owned lookups: document paths by rid and a
//! source span per `MethodDef` rid. Methods whose debug records are absent or carry
//! only hidden points simply have no span; a single damaged record is logged and
//! skipped rather than failing the whole file.

use std::path::Path;

use tracing::debug;

use crate::{
    metadata::{
        root::Root,
        sequencepoints::SequencePoints,
        streams::{Blob, Guid, PdbStream, TablesHeader},
        tables::{DocumentRaw, MethodDebugInformationRaw, TableId},
    },
    Error::NotSupported,
    Result,
};

/// Source span of one method, resolved from its sequence points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSourceSpan {
    /// 1-based `Document` rid of the method's first user-visible sequence point
    pub document: u32,
    /// Lowest start line of the method's user-visible points in that document
    pub min_line: u32,
    /// Highest end line of the method's user-visible points in that document
    pub max_line: u32,
}

/// A parsed standalone Portable PDB.
pub struct PortablePdb {
    /// Unique id tying this symbol file to a build of its assembly
    id: [u8; 20],
    /// Decoded document paths, indexed by rid - 1
    documents: Vec<String>,
    /// Source language GUID per document, indexed by rid - 1
    languages: Vec<Option<uguid::Guid>>,
    /// Source span per `MethodDef` rid, indexed by rid - 1
    spans: Vec<Option<MethodSourceSpan>>,
}

impl PortablePdb {
    /// Reads and parses the symbol file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a Portable PDB, or uses the
    /// uncompressed `#-` tables stream.
    pub fn from_file(path: &Path) -> Result<PortablePdb> {
        Self::from_mem(&std::fs::read(path)?)
    }

    /// Parses a symbol file from a memory buffer.
    ///
    /// # Errors
    /// Returns an error if the buffer is not a Portable PDB or uses the uncompressed
    /// `#-` tables stream.
    pub fn from_mem(data: &[u8]) -> Result<PortablePdb> {
        let root = Root::read(data)?;
        if root.stream("#-").is_some() {
            return Err(NotSupported);
        }

        let pdb_header = match root.stream("#Pdb") {
            Some(header) => header,
            None => return Err(malformed_error!("File has no #Pdb stream")),
        };
        let pdb_stream =
            PdbStream::from(&data[pdb_header.offset as usize..][..pdb_header.size as usize])?;

        let tables_header = match root.stream("#~") {
            Some(header) => header,
            None => return Err(malformed_error!("File has no #~ stream")),
        };
        let tables = TablesHeader::from_with_external(
            &data[tables_header.offset as usize..][..tables_header.size as usize],
            pdb_stream.type_system_rows(),
        )?;

        let blob_header = match root.stream("#Blob") {
            Some(header) => header,
            None => return Err(malformed_error!("File has no #Blob stream")),
        };
        let blob = Blob::from(&data[blob_header.offset as usize..][..blob_header.size as usize])?;

        let guids = match root.stream("#GUID") {
            Some(header) => {
                Some(Guid::from(&data[header.offset as usize..][..header.size as usize])?)
            }
            None => None,
        };

        let document_count = tables.row_count(TableId::Document) as usize;
        let mut documents = Vec::with_capacity(document_count);
        let mut languages = Vec::with_capacity(document_count);
        if let Some(document_table) = tables.table::<DocumentRaw>(TableId::Document) {
            for row in &document_table {
                documents.push(row.decode_name(&blob)?);
                languages.push(match (&guids, row.language) {
                    (Some(heap), language) if language != 0 => {
                        heap.get(language as usize).ok()
                    }
                    _ => None,
                });
            }
        }

        let mut spans = Vec::with_capacity(
            tables.row_count(TableId::MethodDebugInformation) as usize,
        );
        if let Some(debug_table) =
            tables.table::<MethodDebugInformationRaw>(TableId::MethodDebugInformation)
        {
            for row in &debug_table {
                spans.push(method_span(&row, &blob, documents.len() as u32));
            }
        }

        Ok(PortablePdb {
            id: pdb_stream.id,
            documents,
            languages,
            spans,
        })
    }

    /// The 20-byte id tying this symbol file to its assembly build.
    #[must_use]
    pub fn id(&self) -> &[u8; 20] {
        &self.id
    }

    /// Returns the source path of the document with the given rid.
    #[must_use]
    pub fn document_name(&self, rid: u32) -> Option<&str> {
        if rid == 0 {
            return None;
        }
        self.documents.get(rid as usize - 1).map(String::as_str)
    }

    /// Returns the source language GUID of the document with the given rid, if the
    /// compiler recorded one.
    #[must_use]
    pub fn document_language(&self, rid: u32) -> Option<uguid::Guid> {
        if rid == 0 {
            return None;
        }
        *self.languages.get(rid as usize - 1)?
    }

    /// Returns the source span of the method with the given `MethodDef` rid, `None`
    /// when the method has no user-visible sequence points.
    #[must_use]
    pub fn method_span(&self, rid: u32) -> Option<&MethodSourceSpan> {
        if rid == 0 {
            return None;
        }
        self.spans.get(rid as usize - 1)?.as_ref()
    }
}

/// Resolves one `MethodDebugInformation` row to its source span.
///
/// Damaged sequence points or dangling document references are logged and treated as
/// "no source information" so one bad method does not take down the whole file.
fn method_span(
    row: &MethodDebugInformationRaw,
    blob: &Blob,
    document_count: u32,
) -> Option<MethodSourceSpan> {
    if row.sequence_points == 0 {
        return None;
    }

    let points_blob = match blob.get(row.sequence_points as usize) {
        Ok(points_blob) => points_blob,
        Err(error) => {
            debug!(token = %row.token, %error, "skipping method with unreadable sequence points");
            return None;
        }
    };

    let points = match SequencePoints::parse(points_blob, row.document) {
        Ok(points) => points,
        Err(error) => {
            debug!(token = %row.token, %error, "skipping method with malformed sequence points");
            return None;
        }
    };

    let first = points.user_points().next()?;
    let document = first.document;
    if document == 0 || document > document_count {
        debug!(token = %row.token, document, "skipping method with dangling document reference");
        return None;
    }

    let mut min_line = first.start_line;
    let mut max_line = first.end_line;
    for point in points.user_points().filter(|point| point.document == document) {
        min_line = min_line.min(point.start_line);
        max_line = max_line.max(point.end_line);
    }

    Some(MethodSourceSpan {
        document,
        min_line,
        max_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::build_test_pdb;

    #[test]
    fn crafted_pdb() {
        let pdb = PortablePdb::from_mem(&build_test_pdb()).unwrap();

        assert_eq!(pdb.document_name(1).unwrap(), "/src/Calculator.cs");
        assert!(pdb.document_name(0).is_none());
        assert!(pdb.document_name(9).is_none());

        // the fixture marks the document as C#
        assert_eq!(
            pdb.document_language(1).unwrap(),
            uguid::guid!("3f5162f8-07c6-11d3-9053-00c04fa302a1")
        );
        assert!(pdb.document_language(0).is_none());

        // rid 1 is the .ctor with no sequence points
        assert!(pdb.method_span(1).is_none());

        let add = pdb.method_span(2).unwrap();
        assert_eq!(add.document, 1);
        assert_eq!(add.min_line, 10);

        let subtract = pdb.method_span(3).unwrap();
        assert_eq!(subtract.min_line, 17);

        let overflow = pdb.method_span(4).unwrap();
        assert_eq!(overflow.min_line, 25);

        assert!(pdb.method_span(0).is_none());
        assert!(pdb.method_span(99).is_none());
    }

    #[test]
    fn not_a_pdb() {
        assert!(PortablePdb::from_mem(&[0_u8; 64]).is_err());
        assert!(PortablePdb::from_mem(b"garbage data, definitely not metadata").is_err());
    }
}
