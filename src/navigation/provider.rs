//! Navigation facade.
//!
//! [`NavigationDataProvider`] is the surface the test adapter talks to: construct one
//! per binary, query it with the type and method names the test platform reports, and
//! close it when the test run is done. Construction does all the work; queries never
//! touch the file system.

use std::path::Path;

use crate::{
    navigation::{NavigationData, PortableSymbolReader},
    Error::InvalidArgument,
    Result,
};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Per-binary facade over the symbol cache with an open / query / close lifecycle.
#[derive(Debug)]
pub struct NavigationDataProvider {
    reader: Option<PortableSymbolReader>,
}

impl NavigationDataProvider {
    /// Opens the binary at `binary_path` and builds its navigation index.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for a blank path, checked before any
    /// I/O, and [`crate::Error::SymbolLoad`] when the symbols cannot be loaded.
    pub fn new(binary_path: &str) -> Result<NavigationDataProvider> {
        if is_blank(binary_path) {
            return Err(InvalidArgument("binary path must not be blank".to_string()));
        }

        let mut reader = PortableSymbolReader::new();
        reader.cache_symbols(Path::new(binary_path), None)?;

        Ok(NavigationDataProvider {
            reader: Some(reader),
        })
    }

    /// Opens a binary with an additional symbol search path.
    ///
    /// The search path is reserved for symbol backends that probe alternate
    /// locations; the Portable PDB reader only looks next to the binary, so it is
    /// validated and otherwise unused.
    ///
    /// # Errors
    /// Same failure modes as [`Self::new`].
    pub fn with_search_path(binary_path: &str, search_path: &str) -> Result<NavigationDataProvider> {
        if is_blank(binary_path) {
            return Err(InvalidArgument("binary path must not be blank".to_string()));
        }
        if is_blank(search_path) {
            return Err(InvalidArgument("search path must not be blank".to_string()));
        }

        let mut reader = PortableSymbolReader::new();
        reader.cache_symbols(Path::new(binary_path), Some(Path::new(search_path)))?;

        Ok(NavigationDataProvider {
            reader: Some(reader),
        })
    }

    /// Looks up the source location of a method.
    ///
    /// `method_name` tolerates the decorated forms test frameworks report, such as
    /// `Test()` or `Test( )`; trailing parentheses and spaces are stripped before the
    /// lookup. A method that is unknown or has no source information yields
    /// `Ok(None)`. After [`Self::close`], every lookup yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] when either name is blank, checked
    /// before the index is consulted.
    pub fn get_navigation_data(
        &self,
        declaring_type_name: &str,
        method_name: &str,
    ) -> Result<Option<&NavigationData>> {
        if is_blank(declaring_type_name) {
            return Err(InvalidArgument(
                "declaring type name must not be blank".to_string(),
            ));
        }
        if is_blank(method_name) {
            return Err(InvalidArgument("method name must not be blank".to_string()));
        }

        let method_name = method_name.trim_end_matches(['(', ')', ' ']);

        match &self.reader {
            Some(reader) => Ok(reader.navigation_data(declaring_type_name, method_name)),
            None => Ok(None),
        }
    }

    /// Releases the symbol cache. Safe to call more than once; [`Drop`] calls it too.
    pub fn close(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.clear();
        }
    }
}

impl Drop for NavigationDataProvider {
    fn drop(&mut self) {
        self.close();
    }
}
