// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # dotnav
//!
//! Source navigation for .NET test binaries, built in pure Rust.
//!
//! Test platforms report a failing test as a declaring-type name and a method name;
//! turning that into "open this file at this line" requires the compiler-emitted
//! debug symbols. `dotnav` parses a managed assembly and its companion Portable PDB
//! directly — no Windows, no .NET runtime, no DIA — and answers that lookup from an
//! in-memory index.
//!
//! ## Features
//!
//! - **Portable PDB native** - reads the ECMA-335 metadata tables and the Portable PDB
//!   debug tables (`Document`, `MethodDebugInformation`, `#Pdb`) directly
//! - **Memory-mapped access** - binaries are mapped, not copied; only the resolved
//!   strings stay resident after the index is built
//! - **Runtime-faithful names** - nested types resolve to `Namespace.Outer+Nested`,
//!   matching what the test platform reports
//! - **Cross-platform** - works anywhere Rust does
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotnav::NavigationDataProvider;
//!
//! let mut provider = NavigationDataProvider::new("MathTests.dll")?;
//! if let Some(data) = provider.get_navigation_data("Samples.Calculator", "AddsTwoNumbers")? {
//!     println!("{}:{}", data.file_path(), data.min_line());
//! }
//! provider.close();
//! # Ok::<(), dotnav::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - file access: PE container parsing and bounds-checked primitives (exposed through
//!   [`File`] and [`Parser`])
//! - [`metadata`]: ECMA-335 metadata root, streams, tables, sequence points, and the
//!   assembly/PDB views built on them
//! - [`navigation`]: the symbol cache, the lookup index, and the provider facade

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

pub mod metadata;
pub mod navigation;

/// Convenience alias for operations that can fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;
pub use file::{parser::Parser, File};
pub use navigation::{
    NavigationData, NavigationDataProvider, NavigationIndex, PortableSymbolReader,
};
