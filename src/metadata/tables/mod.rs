//! Metadata table infrastructure.
//!
//! The `#~` stream stores its tables back to back, so reaching any one table requires
//! knowing the row size of every table before it. This module provides [`TableId`] for
//! all ECMA-335 and Portable PDB tables, [`TableInfo`] with the row counts and index
//! width decisions, per-table row sizing for the sequential walk, and the generic
//! [`MetadataTable`] giving typed row access to the tables the navigation core reads.
//!
//! # References
//! - [ECMA-335 II.22 / II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)
//! - [Portable PDB Format](https://github.com/dotnet/runtime/blob/main/docs/design/specs/PortablePdb-Metadata.md)

mod document;
mod methoddebuginformation;
mod methoddef;
mod nestedclass;
mod typedef;

pub use document::DocumentRaw;
pub use methoddebuginformation::MethodDebugInformationRaw;
pub use methoddef::{MethodAttributes, MethodDefRaw};
pub use nestedclass::NestedClassRaw;
pub use typedef::TypeDefRaw;

use std::{marker::PhantomData, sync::Arc};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    Error::OutOfBounds,
    Result,
};

/// Identifiers for the metadata tables defined by ECMA-335 and the Portable PDB format.
///
/// The numeric values are the table ids used in metadata tokens and in the `valid`
/// bitmask of the tables stream header. The `*Ptr` and `Enc*` tables only occur in
/// uncompressed (`#-`) streams; they are listed so the bitmask stays interpretable, but
/// such streams are rejected before any table is walked.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
pub enum TableId {
    /// `Module` (0x00) - the current module
    Module = 0x00,
    /// `TypeRef` (0x01) - references to types in external assemblies
    TypeRef = 0x01,
    /// `TypeDef` (0x02) - type definitions in this assembly
    TypeDef = 0x02,
    /// `FieldPtr` (0x03) - field indirection, uncompressed streams only
    FieldPtr = 0x03,
    /// `Field` (0x04) - field definitions
    Field = 0x04,
    /// `MethodPtr` (0x05) - method indirection, uncompressed streams only
    MethodPtr = 0x05,
    /// `MethodDef` (0x06) - method definitions
    MethodDef = 0x06,
    /// `ParamPtr` (0x07) - parameter indirection, uncompressed streams only
    ParamPtr = 0x07,
    /// `Param` (0x08) - method parameters
    Param = 0x08,
    /// `InterfaceImpl` (0x09) - interface implementations
    InterfaceImpl = 0x09,
    /// `MemberRef` (0x0A) - references to external members
    MemberRef = 0x0A,
    /// `Constant` (0x0B) - compile-time constants
    Constant = 0x0B,
    /// `CustomAttribute` (0x0C) - custom attribute applications
    CustomAttribute = 0x0C,
    /// `FieldMarshal` (0x0D) - marshalling information
    FieldMarshal = 0x0D,
    /// `DeclSecurity` (0x0E) - declarative security
    DeclSecurity = 0x0E,
    /// `ClassLayout` (0x0F) - explicit type layout
    ClassLayout = 0x0F,
    /// `FieldLayout` (0x10) - explicit field layout
    FieldLayout = 0x10,
    /// `StandAloneSig` (0x11) - standalone signatures
    StandAloneSig = 0x11,
    /// `EventMap` (0x12) - type-to-event mapping
    EventMap = 0x12,
    /// `EventPtr` (0x13) - event indirection, uncompressed streams only
    EventPtr = 0x13,
    /// `Event` (0x14) - event definitions
    Event = 0x14,
    /// `PropertyMap` (0x15) - type-to-property mapping
    PropertyMap = 0x15,
    /// `PropertyPtr` (0x16) - property indirection, uncompressed streams only
    PropertyPtr = 0x16,
    /// `Property` (0x17) - property definitions
    Property = 0x17,
    /// `MethodSemantics` (0x18) - accessor mappings
    MethodSemantics = 0x18,
    /// `MethodImpl` (0x19) - method implementation mappings
    MethodImpl = 0x19,
    /// `ModuleRef` (0x1A) - external module references
    ModuleRef = 0x1A,
    /// `TypeSpec` (0x1B) - generic type specifications
    TypeSpec = 0x1B,
    /// `ImplMap` (0x1C) - P/Invoke mappings
    ImplMap = 0x1C,
    /// `FieldRVA` (0x1D) - field data addresses
    FieldRVA = 0x1D,
    /// `EncLog` (0x1E) - edit-and-continue log, uncompressed streams only
    EncLog = 0x1E,
    /// `EncMap` (0x1F) - edit-and-continue map, uncompressed streams only
    EncMap = 0x1F,
    /// `Assembly` (0x20) - current assembly metadata
    Assembly = 0x20,
    /// `AssemblyProcessor` (0x21)
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` (0x22)
    AssemblyOS = 0x22,
    /// `AssemblyRef` (0x23) - external assembly references
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` (0x24)
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` (0x25)
    AssemblyRefOS = 0x25,
    /// `File` (0x26) - file references
    File = 0x26,
    /// `ExportedType` (0x27) - forwarded types
    ExportedType = 0x27,
    /// `ManifestResource` (0x28) - embedded or linked resources
    ManifestResource = 0x28,
    /// `NestedClass` (0x29) - nesting relationships between types
    NestedClass = 0x29,
    /// `GenericParam` (0x2A) - generic parameter definitions
    GenericParam = 0x2A,
    /// `MethodSpec` (0x2B) - instantiated generic methods
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` (0x2C) - generic parameter constraints
    GenericParamConstraint = 0x2C,
    /// `Document` (0x30) - source documents, Portable PDB
    Document = 0x30,
    /// `MethodDebugInformation` (0x31) - per-method sequence points, Portable PDB
    MethodDebugInformation = 0x31,
    /// `LocalScope` (0x32) - local variable scopes, Portable PDB
    LocalScope = 0x32,
    /// `LocalVariable` (0x33) - local variables, Portable PDB
    LocalVariable = 0x33,
    /// `LocalConstant` (0x34) - local constants, Portable PDB
    LocalConstant = 0x34,
    /// `ImportScope` (0x35) - import scopes, Portable PDB
    ImportScope = 0x35,
    /// `StateMachineMethod` (0x36) - async state machine mapping, Portable PDB
    StateMachineMethod = 0x36,
    /// `CustomDebugInformation` (0x37) - extensible debug records, Portable PDB
    CustomDebugInformation = 0x37,
}

/// The highest table id plus one, used to size per-table lookup vectors.
pub const TABLE_SLOTS: usize = TableId::CustomDebugInformation as usize + 1;

/// Coded index kinds defined by ECMA-335 II.24.2.6 and the Portable PDB format.
///
/// A coded index packs a table tag into the low bits of a row index; its byte width
/// depends on the largest row count among the tables it can reference.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef` or `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param` or `Property`
    HasConstant,
    /// Any element a custom attribute can be attached to
    HasCustomAttribute,
    /// `Field` or `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef` or `Assembly`
    HasDeclSecurity,
    /// Parent of a `MemberRef`
    MemberRefParent,
    /// `Event` or `Property`
    HasSemantics,
    /// `MethodDef` or `MemberRef`
    MethodDefOrRef,
    /// `Field` or `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef` or `ExportedType`
    Implementation,
    /// Constructor of a custom attribute
    CustomAttributeType,
    /// Scope of a `TypeRef`
    ResolutionScope,
    /// `TypeDef` or `MethodDef`
    TypeOrMethodDef,
    /// Any element a Portable PDB custom debug record can be attached to
    HasCustomDebugInformation,
}

impl CodedIndexType {
    /// The tables this coded index can reference, in tag order.
    ///
    /// `CustomAttributeType` reserves tags 0, 1 and 4; only the referencable tables are
    /// listed and the tag width is fixed separately.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        use TableId::*;

        match self {
            CodedIndexType::TypeDefOrRef => &[TypeDef, TypeRef, TypeSpec],
            CodedIndexType::HasConstant => &[Field, Param, Property],
            CodedIndexType::HasCustomAttribute => &[
                MethodDef,
                Field,
                TypeRef,
                TypeDef,
                Param,
                InterfaceImpl,
                MemberRef,
                Module,
                DeclSecurity,
                Property,
                Event,
                StandAloneSig,
                ModuleRef,
                TypeSpec,
                Assembly,
                AssemblyRef,
                File,
                ExportedType,
                ManifestResource,
                GenericParam,
                GenericParamConstraint,
                MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[Field, Param],
            CodedIndexType::HasDeclSecurity => &[TypeDef, MethodDef, Assembly],
            CodedIndexType::MemberRefParent => &[TypeDef, TypeRef, ModuleRef, MethodDef, TypeSpec],
            CodedIndexType::HasSemantics => &[Event, Property],
            CodedIndexType::MethodDefOrRef => &[MethodDef, MemberRef],
            CodedIndexType::MemberForwarded => &[Field, MethodDef],
            CodedIndexType::Implementation => &[File, AssemblyRef, ExportedType],
            CodedIndexType::CustomAttributeType => &[MethodDef, MemberRef],
            CodedIndexType::ResolutionScope => &[Module, ModuleRef, AssemblyRef, TypeRef],
            CodedIndexType::TypeOrMethodDef => &[TypeDef, MethodDef],
            CodedIndexType::HasCustomDebugInformation => &[
                MethodDef,
                Field,
                TypeRef,
                TypeDef,
                Param,
                InterfaceImpl,
                MemberRef,
                Module,
                DeclSecurity,
                Property,
                Event,
                StandAloneSig,
                ModuleRef,
                TypeSpec,
                Assembly,
                AssemblyRef,
                File,
                ExportedType,
                ManifestResource,
                GenericParam,
                GenericParamConstraint,
                MethodSpec,
                Document,
                LocalScope,
                LocalVariable,
                LocalConstant,
                ImportScope,
            ],
        }
    }

    /// The number of tag bits this coded index carries.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        match self {
            CodedIndexType::HasFieldMarshal
            | CodedIndexType::HasSemantics
            | CodedIndexType::MethodDefOrRef
            | CodedIndexType::MemberForwarded
            | CodedIndexType::TypeOrMethodDef => 1,
            CodedIndexType::TypeDefOrRef
            | CodedIndexType::HasConstant
            | CodedIndexType::HasDeclSecurity
            | CodedIndexType::Implementation
            | CodedIndexType::ResolutionScope => 2,
            CodedIndexType::MemberRefParent | CodedIndexType::CustomAttributeType => 3,
            CodedIndexType::HasCustomAttribute | CodedIndexType::HasCustomDebugInformation => 5,
        }
    }
}

/// Holds information about the size that reference index fields have
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// The count of rows in this table
    pub rows: u32,
    /// Number of bits required to represent any valid row index
    pub bits: u8,
    /// If the count is > `u16::MAX`, indexes into this table are 4 bytes instead of 2
    pub is_large: bool,
}

impl TableRowInfo {
    /// Creates a new [`TableRowInfo`] for the given row count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// `TableInfo` holds the row counts, heap index widths and coded index widths that
/// govern how rows of every table in this image are laid out.
///
/// For a standalone Portable PDB the row counts of the type-system tables live in the
/// `#Pdb` stream rather than the local tables stream; they are merged in as external
/// counts so indices into those tables are sized correctly.
#[derive(Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Cheap-copy reference to a [`TableInfo`] structure
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Build a new [`TableInfo`] from a tables stream header.
    ///
    /// ## Arguments
    /// * `data` - The tables stream, starting at its header
    /// * `valid_bitvec` - The valid bitvector from the header
    ///
    /// # Errors
    /// Returns an error if the header data is insufficient.
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        Self::new_with_external(data, valid_bitvec, &[])
    }

    /// Build a new [`TableInfo`], merging externally supplied row counts.
    ///
    /// ## Arguments
    /// * `data` - The tables stream, starting at its header
    /// * `valid_bitvec` - The valid bitvector from the header
    /// * `external` - Row counts for tables that live in another image, from `#Pdb`
    ///
    /// # Errors
    /// Returns an error if the header data is insufficient.
    pub fn new_with_external(
        data: &[u8],
        valid_bitvec: u64,
        external: &[(TableId, u32)],
    ) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); TABLE_SLOTS];
        let mut next_row_offset = 24;

        for table_id in TableId::iter() {
            if data.len() < next_row_offset {
                return Err(OutOfBounds);
            }

            if (valid_bitvec & (1_u64 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if row_count == 0 {
                // Empty tables are omitted from valid samples
                continue;
            }

            rows[table_id as usize] = TableRowInfo::new(row_count);
        }

        for (table_id, row_count) in external {
            if rows[*table_id as usize].rows == 0 {
                rows[*table_id as usize] = TableRowInfo::new(*row_count);
            }
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    #[cfg(test)]
    /// Special constructor for unit-tests
    ///
    /// ## Arguments
    /// * `valid_tables` - A slice of tuples providing (table_id, row_count) of the valid tables
    /// * `large_str` - Specify if the #Strings heap indexes are 4 or 2 bytes
    /// * `large_blob` - Specify if the #Blob heap indexes are 4 or 2 bytes
    /// * `large_guid` - Specify if the #GUID heap indexes are 4 or 2 bytes
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TABLE_SLOTS],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Returns true if the requested table has more than 2^16 rows and hence requires
    /// 4-byte indexes.
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// Indicates the size of indexes into the `#Strings` heap. True means 4 bytes.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Indicates the size of indexes into the `#GUID` heap. True means 4 bytes.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Indicates the size of indexes into the `#Blob` heap. True means 4 bytes.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Returns the width of `#Strings` heap indexes in bytes
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Returns the width of `#GUID` heap indexes in bytes
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Returns the width of `#Blob` heap indexes in bytes
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Returns the metadata for a specific table.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Returns the number of bits required to represent an index into a specific table.
    #[must_use]
    pub fn table_index_bits(&self, table_id: TableId) -> u8 {
        self.rows[table_id as usize].bits
    }

    /// Returns the number of bytes required to represent an index into a specific table.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Returns the cached bit size for a specific coded index type.
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Returns the cached byte size for a specific coded index reference.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.table_index_bits(*table))
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }
}

/// Returns the size in bytes of one row of the given table under the given widths.
///
/// Used to walk the physically concatenated tables of the `#~` stream past tables the
/// reader has no typed representation for.
#[must_use]
#[rustfmt::skip]
pub fn table_row_size(table_id: TableId, info: &TableInfo) -> u32 {
    let str_ = u32::from(info.str_bytes());
    let guid = u32::from(info.guid_bytes());
    let blob = u32::from(info.blob_bytes());
    let idx = |id: TableId| u32::from(info.table_index_bytes(id));
    let coded = |ct: CodedIndexType| u32::from(info.coded_index_bytes(ct));

    use TableId::*;
    match table_id {
        Module => 2 + str_ + guid * 3,
        TypeRef => coded(CodedIndexType::ResolutionScope) + str_ * 2,
        TypeDef => {
            4 + str_ * 2
                + coded(CodedIndexType::TypeDefOrRef)
                + idx(Field)
                + idx(MethodDef)
        }
        FieldPtr => idx(Field),
        Field => 2 + str_ + blob,
        MethodPtr => idx(MethodDef),
        MethodDef => 4 + 2 + 2 + str_ + blob + idx(Param),
        ParamPtr => idx(Param),
        Param => 2 + 2 + str_,
        InterfaceImpl => idx(TypeDef) + coded(CodedIndexType::TypeDefOrRef),
        MemberRef => coded(CodedIndexType::MemberRefParent) + str_ + blob,
        Constant => 2 + coded(CodedIndexType::HasConstant) + blob,
        CustomAttribute => {
            coded(CodedIndexType::HasCustomAttribute)
                + coded(CodedIndexType::CustomAttributeType)
                + blob
        }
        FieldMarshal => coded(CodedIndexType::HasFieldMarshal) + blob,
        DeclSecurity => 2 + coded(CodedIndexType::HasDeclSecurity) + blob,
        ClassLayout => 2 + 4 + idx(TypeDef),
        FieldLayout => 4 + idx(Field),
        StandAloneSig => blob,
        EventMap => idx(TypeDef) + idx(Event),
        EventPtr => idx(Event),
        Event => 2 + str_ + coded(CodedIndexType::TypeDefOrRef),
        PropertyMap => idx(TypeDef) + idx(Property),
        PropertyPtr => idx(Property),
        Property => 2 + str_ + blob,
        MethodSemantics => 2 + idx(MethodDef) + coded(CodedIndexType::HasSemantics),
        MethodImpl => idx(TypeDef) + coded(CodedIndexType::MethodDefOrRef) * 2,
        ModuleRef => str_,
        TypeSpec => blob,
        ImplMap => 2 + coded(CodedIndexType::MemberForwarded) + str_ + idx(ModuleRef),
        FieldRVA => 4 + idx(Field),
        EncLog => 4 + 4,
        EncMap => 4,
        Assembly => 4 + 2 * 4 + 4 + blob + str_ * 2,
        AssemblyProcessor => 4,
        AssemblyOS => 4 * 3,
        AssemblyRef => 2 * 4 + 4 + blob + str_ * 2 + blob,
        AssemblyRefProcessor => 4 + idx(AssemblyRef),
        AssemblyRefOS => 4 * 3 + idx(AssemblyRef),
        File => 4 + str_ + blob,
        ExportedType => 4 + 4 + str_ * 2 + coded(CodedIndexType::Implementation),
        ManifestResource => 4 + 4 + str_ + coded(CodedIndexType::Implementation),
        NestedClass => idx(TypeDef) * 2,
        GenericParam => 2 + 2 + coded(CodedIndexType::TypeOrMethodDef) + str_,
        MethodSpec => coded(CodedIndexType::MethodDefOrRef) + blob,
        GenericParamConstraint => idx(GenericParam) + coded(CodedIndexType::TypeDefOrRef),
        Document => blob + guid + blob + guid,
        MethodDebugInformation => idx(Document) + blob,
        LocalScope => {
            idx(MethodDef) + idx(ImportScope) + idx(LocalVariable) + idx(LocalConstant) + 4 + 4
        }
        LocalVariable => 2 + 2 + str_,
        LocalConstant => str_ + blob,
        ImportScope => idx(ImportScope) + blob,
        StateMachineMethod => idx(MethodDef) * 2,
        CustomDebugInformation => {
            coded(CodedIndexType::HasCustomDebugInformation) + guid + blob
        }
    }
}

/// Trait for types that represent one parsed row of a metadata table.
pub trait RowReadable: Sized + Send {
    /// Calculates the size in bytes of a single row for this table type.
    ///
    /// ## Arguments
    /// * `sizes` - Table size information used to determine the index widths
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Reads and parses a single row from the provided byte buffer.
    ///
    /// ## Arguments
    /// * `data` - The byte buffer containing the table data
    /// * `offset` - Current read position, advanced by the number of bytes consumed
    /// * `rid` - The 1-based row identifier for this entry
    /// * `sizes` - Table size information for parsing variable-sized fields
    ///
    /// # Errors
    /// Returns an error if the buffer contains insufficient data for a complete row.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Generic container for metadata table data with typed row access.
///
/// Wraps the raw bytes of one table and parses rows on demand; no row data is copied
/// until a row is requested.
pub struct MetadataTable<'a, T> {
    /// Reference to the raw table data bytes
    data: &'a [u8],
    /// Total number of rows in this table
    row_count: u32,
    /// Size in bytes of each row
    row_size: u32,
    /// Table configuration and size information
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Creates a new metadata table over raw byte data.
    ///
    /// ## Arguments
    /// * `data` - The raw byte buffer containing the table data
    /// * `row_count` - The total number of rows present in the table
    /// * `sizes` - Table configuration for row size calculation
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer is too small for the
    /// specified row count.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        if (row_count as u64) * u64::from(row_size) > data.len() as u64 {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Returns the size of a single row in bytes.
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Returns the total number of rows in this table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Retrieves a specific row by its 1-based index.
    ///
    /// Row 0 is reserved and represents a null reference in the metadata format.
    /// Returns `None` if the index is out of bounds or parsing fails.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<T> {
        if index == 0 || self.row_count < index {
            return None;
        }

        T::row_read(
            self.data,
            &mut ((index as usize - 1) * self.row_size as usize),
            index,
            &self.sizes,
        )
        .ok()
    }

    /// Creates a sequential iterator over all rows in the table.
    #[must_use]
    pub fn iter(&'a self) -> TableIterator<'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
            current_offset: 0,
        }
    }
}

impl<'a, T: RowReadable> IntoIterator for &'a MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator for metadata table rows.
///
/// Rows are parsed lazily as the iterator advances; a parsing error ends iteration.
pub struct TableIterator<'a, T> {
    table: &'a MetadataTable<'a, T>,
    current_row: u32,
    current_offset: usize,
}

impl<'a, T: RowReadable> Iterator for TableIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        match T::row_read(
            self.table.data,
            &mut self.current_offset,
            self.current_row + 1,
            &self.table.sizes,
        ) {
            Ok(row) => {
                self.current_row += 1;
                Some(row)
            }
            Err(_) => None,
        }
    }
}
