//! Symbol cache builder.
//!
//! Loads a test binary together with its companion Portable PDB and resolves every
//! user method to a source location up front. The two files are read and parsed inside
//! [`PortableSymbolReader::cache_symbols`]; their buffers are dropped as soon as the
//! index is built, so only the resolved strings stay resident.

use std::path::Path;

use tracing::debug;

use crate::{
    metadata::{assembly::AssemblyMetadata, pdb::PortablePdb},
    navigation::{NavigationData, NavigationIndex},
    Error::SymbolLoad,
    Result,
};

/// Builds and owns the navigation index for one binary.
#[derive(Debug, Default)]
pub struct PortableSymbolReader {
    index: NavigationIndex,
}

impl PortableSymbolReader {
    /// Creates a reader with an empty index.
    #[must_use]
    pub fn new() -> PortableSymbolReader {
        PortableSymbolReader::default()
    }

    /// Loads symbols for `binary_path` and populates the index.
    ///
    /// The PDB path is derived by swapping the binary's extension for `pdb`.
    /// `search_path` is accepted for interface parity with symbol readers that probe
    /// alternate locations; this reader only ever looks next to the binary.
    ///
    /// Methods without usable debug information are skipped with a diagnostic log.
    /// On failure the index is left empty.
    ///
    /// # Errors
    /// Returns [`crate::Error::SymbolLoad`] when the binary or its PDB cannot be read
    /// or parsed.
    pub fn cache_symbols(&mut self, binary_path: &Path, _search_path: Option<&Path>) -> Result<()> {
        self.index.clear();
        match Self::build(binary_path) {
            Ok(index) => {
                self.index = index;
                Ok(())
            }
            Err(error) => Err(SymbolLoad {
                path: binary_path.to_path_buf(),
                source: Box::new(error),
            }),
        }
    }

    fn build(binary_path: &Path) -> Result<NavigationIndex> {
        let pdb_path = binary_path.with_extension("pdb");
        let pdb = PortablePdb::from_file(&pdb_path)?;
        let assembly = AssemblyMetadata::from_file(binary_path)?;

        let mut index = NavigationIndex::new();
        for method in assembly.methods() {
            let Some(span) = pdb.method_span(method.rid) else {
                debug!(
                    declaring_type = %method.declaring_type,
                    method = %method.name,
                    "skipping method without source information"
                );
                continue;
            };

            // method_span only yields spans whose document rid resolves
            let Some(file_path) = pdb.document_name(span.document) else {
                continue;
            };

            index.insert(
                &method.declaring_type,
                &method.name,
                NavigationData::new(file_path.to_string(), span.min_line),
            );
        }

        Ok(index)
    }

    /// The built index; empty before [`Self::cache_symbols`] succeeds.
    #[must_use]
    pub fn index(&self) -> &NavigationIndex {
        &self.index
    }

    /// Looks up a method location in the built index.
    #[must_use]
    pub fn navigation_data(&self, type_name: &str, method_name: &str) -> Option<&NavigationData> {
        self.index.lookup(type_name, method_name)
    }

    /// Empties the index.
    pub fn clear(&mut self) {
        self.index.clear();
    }
}
