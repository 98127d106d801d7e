//! Metadata stream parsers.
//!
//! Each stream of the metadata root gets its own reader: the heaps (`#Strings`,
//! `#Blob`, `#GUID`), the tables stream (`#~`) and the Portable PDB stream (`#Pdb`).
//! All readers borrow the underlying file data; nothing is copied out of the image.

mod blob;
mod guid;
mod pdbstream;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use pdbstream::PdbStream;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
