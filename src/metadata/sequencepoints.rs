//! Sequence-points blob decoding.
//!
//! A `MethodDebugInformation` row points at a blob describing where each IL range of
//! the method maps in source. The blob is a delta-compressed record list: IL offsets
//! and line numbers are stored as differences from the previous record, the first
//! non-hidden record carries absolute start line and column, and a zero IL delta on a
//! later record switches the current document. Hidden records mark compiler-generated
//! IL with no source counterpart.
//!
//! # Reference
//! - [Portable PDB: sequence points blob](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md#sequence-points-blob)

use crate::{file::parser::Parser, Result};

/// Start line value marking a hidden sequence point.
pub const HIDDEN_LINE: u32 = 0x00FE_EFEE;

/// One decoded sequence point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencePoint {
    /// IL offset of the range this point covers
    pub il_offset: u32,
    /// 1-based `Document` rid the point belongs to
    pub document: u32,
    /// Start line in source, 1-based; [`HIDDEN_LINE`] for hidden points
    pub start_line: u32,
    /// Start column in source, 1-based; 0 for hidden points
    pub start_column: u32,
    /// End line in source
    pub end_line: u32,
    /// End column in source
    pub end_column: u32,
}

impl SequencePoint {
    /// True when this point marks compiler-generated IL without a source location.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.start_line == HIDDEN_LINE
    }
}

/// A fully decoded sequence-points blob.
pub struct SequencePoints {
    /// `StandAloneSig` rid of the local variable signature, 0 if none
    pub local_signature: u32,
    /// The decoded points, in IL offset order
    pub points: Vec<SequencePoint>,
}

impl SequencePoints {
    /// Decode a sequence-points blob.
    ///
    /// # Arguments
    /// * `data` - The blob contents, with the heap length prefix already stripped
    /// * `document` - The `Document` rid from the owning `MethodDebugInformation` row;
    ///   0 when the method spans documents, in which case the blob opens with the
    ///   initial document
    ///
    /// # Errors
    /// Returns an error if the blob is truncated or a delta moves a line or column
    /// out of range.
    pub fn parse(data: &[u8], document: u32) -> Result<SequencePoints> {
        let mut parser = Parser::new(data);

        let local_signature = parser.read_compressed_uint()?;
        let mut current_document = if document == 0 {
            parser.read_compressed_uint()?
        } else {
            document
        };

        let mut points = Vec::new();
        let mut il_offset = 0_u32;
        let mut start_line = 0_u32;
        let mut start_column = 0_u32;
        let mut first_record = true;
        let mut seen_non_hidden = false;

        while parser.has_more_data() {
            let il_delta = parser.read_compressed_uint()?;
            if !first_record && il_delta == 0 {
                // document-record
                current_document = parser.read_compressed_uint()?;
                continue;
            }

            il_offset = if first_record {
                il_delta
            } else {
                match il_offset.checked_add(il_delta) {
                    Some(offset) => offset,
                    None => return Err(malformed_error!("IL offset delta overflows")),
                }
            };
            first_record = false;

            let line_delta = parser.read_compressed_uint()?;
            let column_delta = if line_delta == 0 {
                i64::from(parser.read_compressed_uint()?)
            } else {
                i64::from(parser.read_compressed_int()?)
            };

            if line_delta == 0 && column_delta == 0 {
                points.push(SequencePoint {
                    il_offset,
                    document: current_document,
                    start_line: HIDDEN_LINE,
                    start_column: 0,
                    end_line: HIDDEN_LINE,
                    end_column: 0,
                });
                continue;
            }

            if seen_non_hidden {
                start_line = apply_delta(start_line, parser.read_compressed_int()?)?;
                start_column = apply_delta(start_column, parser.read_compressed_int()?)?;
            } else {
                start_line = parser.read_compressed_uint()?;
                start_column = parser.read_compressed_uint()?;
                seen_non_hidden = true;
            }

            let end_line = match start_line.checked_add(line_delta) {
                Some(line) => line,
                None => return Err(malformed_error!("End line overflows")),
            };
            let end_column = apply_delta(start_column, column_delta)?;

            points.push(SequencePoint {
                il_offset,
                document: current_document,
                start_line,
                start_column,
                end_line,
                end_column,
            });
        }

        Ok(SequencePoints {
            local_signature,
            points,
        })
    }

    /// Iterates the points carrying a real source location: not hidden, line at
    /// least 1.
    pub fn user_points(&self) -> impl Iterator<Item = &SequencePoint> {
        self.points
            .iter()
            .filter(|point| !point.is_hidden() && point.start_line >= 1)
    }
}

fn apply_delta(value: u32, delta: impl Into<i64>) -> Result<u32> {
    let result = i64::from(value) + delta.into();
    u32::try_from(result)
        .map_err(|_| malformed_error!("Sequence point delta moves value out of range"))
}
