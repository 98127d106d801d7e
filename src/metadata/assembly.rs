//! Assembly-side metadata for symbol navigation.
//!
//! The Portable PDB only knows methods by rid; the names live in the assembly itself.
//! [`AssemblyMetadata`] loads the test binary, walks `TypeDef`, `MethodDef` and
//! `NestedClass`, and yields every user method with its fully qualified declaring type
//! name, the same form the test platform reports: `Namespace.Outer+Nested` for nested
//! types, `+` separated per CLR convention.

use std::path::Path;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        root::Root,
        streams::{Strings, TablesHeader},
        tables::{MethodDefRaw, NestedClassRaw, TableId, TypeDefRaw},
    },
    Error::NotSupported,
    Result,
};

/// Deepest nesting chain the name builder will follow before declaring the
/// `NestedClass` table cyclic.
const MAX_NESTING_DEPTH: usize = 64;

/// One method defined in the assembly, resolved to names.
pub struct AssemblyMethod {
    /// `MethodDef` rid, which equals the `MethodDebugInformation` rid in the PDB
    pub rid: u32,
    /// Method name
    pub name: String,
    /// Fully qualified name of the declaring type
    pub declaring_type: String,
}

/// The method list of a loaded .NET assembly, resolved for navigation lookups.
///
/// Constructors and type initializers are omitted; they carry `RTSpecialName` and are
/// never test methods.
pub struct AssemblyMetadata {
    methods: Vec<AssemblyMethod>,
}

impl AssemblyMetadata {
    /// Loads the assembly at `path` and resolves its method list.
    ///
    /// # Errors
    /// Returns an error if the file is not a managed PE, its metadata is malformed, or
    /// it uses the uncompressed `#-` tables stream.
    pub fn from_file(path: &Path) -> Result<AssemblyMetadata> {
        Self::from_loaded(&File::from_file(path)?)
    }

    /// Loads an assembly from a memory buffer and resolves its method list.
    ///
    /// # Errors
    /// Returns an error if the buffer is not a managed PE, its metadata is malformed,
    /// or it uses the uncompressed `#-` tables stream.
    pub fn from_mem(data: Vec<u8>) -> Result<AssemblyMetadata> {
        Self::from_loaded(&File::from_mem(data)?)
    }

    fn from_loaded(file: &File) -> Result<AssemblyMetadata> {
        let (clr_rva, clr_size) = file.clr();
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20 = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let meta_offset = file.rva_to_offset(cor20.meta_data_rva as usize)?;
        let meta = file.data_slice(meta_offset, cor20.meta_data_size as usize)?;

        let root = Root::read(meta)?;
        if root.stream("#-").is_some() {
            return Err(NotSupported);
        }

        let tables_header = match root.stream("#~") {
            Some(header) => header,
            None => return Err(malformed_error!("Assembly has no #~ stream")),
        };
        let tables =
            TablesHeader::from(&meta[tables_header.offset as usize..][..tables_header.size as usize])?;

        let strings_header = match root.stream("#Strings") {
            Some(header) => header,
            None => return Err(malformed_error!("Assembly has no #Strings stream")),
        };
        let strings =
            Strings::from(&meta[strings_header.offset as usize..][..strings_header.size as usize])?;

        let type_defs: Vec<TypeDefRaw> = match tables.table::<TypeDefRaw>(TableId::TypeDef) {
            Some(table) => table.iter().collect(),
            None => Vec::new(),
        };

        // nested rid -> enclosing rid
        let mut enclosing = vec![0_u32; type_defs.len() + 1];
        if let Some(nested) = tables.table::<NestedClassRaw>(TableId::NestedClass) {
            for row in &nested {
                if (row.nested_class as usize) < enclosing.len() {
                    enclosing[row.nested_class as usize] = row.enclosing_class;
                }
            }
        }

        let mut type_names = Vec::with_capacity(type_defs.len() + 1);
        type_names.push(String::new()); // rid 0 is the null index
        for type_def in &type_defs {
            type_names.push(qualified_name(type_def, &type_defs, &enclosing, &strings)?);
        }

        let method_count = tables.row_count(TableId::MethodDef);
        let mut methods = Vec::new();
        if let Some(method_table) = tables.table::<MethodDefRaw>(TableId::MethodDef) {
            for (index, type_def) in type_defs.iter().enumerate() {
                let range_start = type_def.method_list;
                let range_end = match type_defs.get(index + 1) {
                    Some(next) => next.method_list,
                    None => method_count + 1,
                };
                if range_start == 0 || range_start > range_end {
                    return Err(malformed_error!(
                        "TypeDef method range is invalid - {}..{}",
                        range_start,
                        range_end
                    ));
                }

                for rid in range_start..range_end {
                    let Some(method) = method_table.get(rid) else {
                        continue;
                    };
                    if method.is_constructor() {
                        continue;
                    }

                    methods.push(AssemblyMethod {
                        rid,
                        name: strings.get(method.name as usize)?.to_string(),
                        declaring_type: type_names[index + 1].clone(),
                    });
                }
            }
        }

        Ok(AssemblyMetadata { methods })
    }

    /// All non-constructor methods of the assembly, in rid order.
    #[must_use]
    pub fn methods(&self) -> &[AssemblyMethod] {
        &self.methods
    }
}

/// Builds the fully qualified name of a type: `Namespace.Name` for top-level types,
/// the enclosing chain joined with `+` for nested ones. Nested types take the
/// namespace of their outermost enclosing type.
fn qualified_name(
    type_def: &TypeDefRaw,
    type_defs: &[TypeDefRaw],
    enclosing: &[u32],
    strings: &Strings,
) -> Result<String> {
    let mut chain = vec![strings.get(type_def.type_name as usize)?];

    let mut current = type_def;
    let mut depth = 0;
    while enclosing[current.rid as usize] != 0 {
        depth += 1;
        if depth > MAX_NESTING_DEPTH {
            return Err(malformed_error!(
                "NestedClass chain too deep or cyclic at TypeDef rid {}",
                type_def.rid
            ));
        }

        let enclosing_rid = enclosing[current.rid as usize] as usize;
        current = match type_defs.get(enclosing_rid - 1) {
            Some(outer) => outer,
            None => {
                return Err(malformed_error!(
                    "NestedClass points at missing TypeDef rid {}",
                    enclosing_rid
                ))
            }
        };
        chain.push(strings.get(current.type_name as usize)?);
    }
    chain.reverse();

    let namespace = strings.get(current.type_namespace as usize)?;
    if namespace.is_empty() {
        Ok(chain.join("+"))
    } else {
        Ok(format!("{}.{}", namespace, chain.join("+")))
    }
}
