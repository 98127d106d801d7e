use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        $crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        $crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The lower parsing layers (PE container, metadata root, streams, tables) report the
/// file-format taxonomy directly. The navigation layer wraps any of those in
/// [`Error::SymbolLoad`] so a caller holding a binary path gets a single failure mode for
/// "symbols could not be loaded for this binary", with the underlying cause preserved.
#[derive(Error, Debug)]
pub enum Error {
    /// A blank or otherwise unusable argument was passed to a public navigation operation.
    ///
    /// Raised eagerly, before any I/O or index access takes place.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The companion debug-symbol file (or the binary's own metadata) could not be loaded.
    ///
    /// Covers a missing or unreadable `.pdb` next to the binary, a malformed Portable PDB
    /// image, and a binary whose PE/metadata structures cannot be parsed. The build attempt
    /// for that binary is over; no partial index is retained.
    #[error("failed to load symbols for {path}: {source}")]
    SymbolLoad {
        /// The binary the symbols were requested for
        path: PathBuf,
        /// The underlying parse or I/O failure
        source: Box<Error>,
    },

    /// The file is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Raised for images that are not .NET PE executables or Portable PDB metadata images,
    /// and for `#-` (uncompressed/EnC) tables streams.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}
