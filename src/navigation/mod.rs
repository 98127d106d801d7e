//! Source navigation for .NET test binaries.
//!
//! Maps a `(declaring type, method name)` pair, as the test platform reports it, to the
//! source file and line where the method starts. The mapping is built once per binary
//! from its Portable PDB and held in memory:
//!
//! - [`PortableSymbolReader`] loads the binary and its companion `.pdb` and caches
//!   every resolvable method.
//! - [`NavigationIndex`] is the resulting two-level lookup table.
//! - [`NavigationDataProvider`] is the facade with the open / query / close lifecycle.

mod index;
mod provider;
mod reader;

pub use index::NavigationIndex;
pub use provider::NavigationDataProvider;
pub use reader::PortableSymbolReader;

/// Source location of one method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationData {
    file_path: String,
    min_line: u32,
}

impl NavigationData {
    /// Values only exist for methods with at least one user-visible sequence point,
    /// so `min_line` is always at least 1.
    pub(crate) fn new(file_path: String, min_line: u32) -> NavigationData {
        NavigationData {
            file_path,
            min_line,
        }
    }

    /// Path of the source file the method is defined in, as recorded by the compiler.
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// First source line of the method, 1-based.
    #[must_use]
    pub fn min_line(&self) -> u32 {
        self.min_line
    }
}
