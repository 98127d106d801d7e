//! ECMA-335 metadata parsing.
//!
//! Everything needed to get from raw bytes to navigation facts: the CLR runtime header
//! and metadata root, the stream readers, the raw table rows, and the two high-level
//! views — [`assembly::AssemblyMetadata`] for method names and
//! [`pdb::PortablePdb`] for source locations.

pub mod assembly;
pub mod cor20header;
pub mod pdb;
pub mod root;
pub mod sequencepoints;
pub mod streams;
pub mod tables;
pub mod token;
