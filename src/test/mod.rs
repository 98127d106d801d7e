//! Shared in-memory fixtures for unit and integration tests.
//!
//! Builds the three images the tests need from scratch, byte by byte:
//! - a minimal .NET PE wrapper ([`build_net_binary`]),
//! - a test assembly with `Samples.Calculator`, a nested `Edge` class and four
//!   methods including a `.ctor` ([`build_test_assembly`]),
//! - the matching standalone Portable PDB with document `/src/Calculator.cs` and
//!   sequence points for every non-constructor method ([`build_test_pdb`]).
//!
//! The assembly and PDB agree on method rids, so the navigation tests can exercise the
//! full pipeline without a compiler in the loop.

/// File offset and RVA of the single `.text` section.
const SECTION_FILE_OFFSET: u32 = 0x200;
const SECTION_RVA: u32 = 0x2000;

/// The CLR header sits at the section start; metadata follows it.
const METADATA_RVA: u32 = SECTION_RVA + 72;

fn w16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn w32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn compressed_uint(value: u32) -> Vec<u8> {
    assert!(value < 0x80, "fixture heaps stay below the one-byte limit");
    vec![value as u8]
}

/// Appends a length-prefixed blob to a `#Blob` heap, returning its offset.
fn push_blob(heap: &mut Vec<u8>, bytes: &[u8]) -> u32 {
    let offset = heap.len() as u32;
    heap.extend(compressed_uint(bytes.len() as u32));
    heap.extend_from_slice(bytes);
    offset
}

/// Appends a null-terminated string to a `#Strings` heap, returning its offset.
fn push_str(heap: &mut Vec<u8>, value: &str) -> u32 {
    let offset = heap.len() as u32;
    heap.extend_from_slice(value.as_bytes());
    heap.push(0);
    offset
}

/// Assembles a metadata image: BSJB root, stream directory, stream contents.
fn metadata_image(streams: &[(&str, &[u8])]) -> Vec<u8> {
    const VERSION: &[u8; 12] = b"v4.0.30319\0\0";

    let mut directory_size = 16 + VERSION.len() + 4;
    for (name, _) in streams {
        directory_size += 8 + (((name.len() + 1) + 3) & !3);
    }

    let mut image = Vec::new();
    w32(&mut image, 0x424A_5342); // BSJB
    w16(&mut image, 1);
    w16(&mut image, 1);
    w32(&mut image, 0); // reserved
    w32(&mut image, VERSION.len() as u32);
    image.extend_from_slice(VERSION);
    w16(&mut image, 0); // flags
    w16(&mut image, streams.len() as u16);

    let mut data_offset = directory_size as u32;
    for (name, data) in streams {
        w32(&mut image, data_offset);
        w32(&mut image, data.len() as u32);
        image.extend_from_slice(name.as_bytes());
        image.push(0);
        while image.len() % 4 != 0 {
            image.push(0);
        }
        data_offset += data.len() as u32;
    }

    assert_eq!(image.len(), directory_size);
    for (_, data) in streams {
        image.extend_from_slice(*data);
    }

    image
}

/// Wraps a CLR payload (COR20 header + metadata) into a parseable PE32 image with one
/// `.text` section at RVA 0x2000 / file offset 0x200.
fn build_pe(payload: &[u8]) -> Vec<u8> {
    let raw_size = (payload.len() as u32 + 0x1FF) & !0x1FF;

    let mut image = Vec::new();

    // DOS header: magic and e_lfanew, rest zero
    image.extend_from_slice(b"MZ");
    image.resize(0x3C, 0);
    w32(&mut image, 0x80);
    image.resize(0x80, 0);

    image.extend_from_slice(b"PE\0\0");

    // COFF header
    w16(&mut image, 0x014C); // i386
    w16(&mut image, 1); // one section
    w32(&mut image, 0); // timestamp
    w32(&mut image, 0);
    w32(&mut image, 0);
    w16(&mut image, 0xE0); // optional header size, PE32
    w16(&mut image, 0x2102); // executable | dll | 32-bit

    // optional header, PE32
    w16(&mut image, 0x010B);
    image.push(8); // linker major
    image.push(0);
    w32(&mut image, raw_size); // size of code
    w32(&mut image, 0);
    w32(&mut image, 0);
    w32(&mut image, 0); // entry point
    w32(&mut image, SECTION_RVA); // base of code
    w32(&mut image, 0); // base of data
    w32(&mut image, 0x0040_0000); // image base
    w32(&mut image, 0x1000); // section alignment
    w32(&mut image, 0x200); // file alignment
    w16(&mut image, 4); // os major
    w16(&mut image, 0);
    w16(&mut image, 0); // image version
    w16(&mut image, 0);
    w16(&mut image, 4); // subsystem major
    w16(&mut image, 0);
    w32(&mut image, 0); // win32 version
    w32(&mut image, 0x3000); // size of image
    w32(&mut image, 0x200); // size of headers
    w32(&mut image, 0); // checksum
    w16(&mut image, 3); // console subsystem
    w16(&mut image, 0); // dll characteristics
    w32(&mut image, 0x0010_0000); // stack reserve
    w32(&mut image, 0x1000);
    w32(&mut image, 0x0010_0000); // heap reserve
    w32(&mut image, 0x1000);
    w32(&mut image, 0); // loader flags
    w32(&mut image, 16); // directory count

    // data directories; index 14 is the CLR runtime header
    for index in 0..16 {
        if index == 14 {
            w32(&mut image, SECTION_RVA);
            w32(&mut image, 72);
        } else {
            w32(&mut image, 0);
            w32(&mut image, 0);
        }
    }

    // section header
    image.extend_from_slice(b".text\0\0\0");
    w32(&mut image, payload.len() as u32); // virtual size
    w32(&mut image, SECTION_RVA);
    w32(&mut image, raw_size);
    w32(&mut image, SECTION_FILE_OFFSET);
    w32(&mut image, 0); // relocations
    w32(&mut image, 0); // line numbers
    w32(&mut image, 0); // counts
    w32(&mut image, 0x6000_0020); // code | read | execute

    image.resize(SECTION_FILE_OFFSET as usize, 0);
    image.extend_from_slice(payload);
    image.resize((SECTION_FILE_OFFSET + raw_size) as usize, 0);

    image
}

/// Builds the COR20 header for a metadata image of the given size.
fn cor20_header(metadata_size: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(72);
    w32(&mut header, 72); // cb
    w16(&mut header, 2); // runtime major
    w16(&mut header, 5);
    w32(&mut header, METADATA_RVA);
    w32(&mut header, metadata_size);
    w32(&mut header, 0x0000_0001); // ILONLY
    w32(&mut header, 0); // entry point
    header.resize(72, 0);
    header
}

/// A minimal managed PE: valid DOS/PE/COFF/optional headers, one section, a CLR
/// directory pointing at a COR20 header, and a token metadata payload.
pub fn build_net_binary() -> Vec<u8> {
    let metadata = [0_u8; 4];
    let mut payload = cor20_header(metadata.len() as u32);
    payload.extend_from_slice(&metadata);
    build_pe(&payload)
}

/// The test assembly: `Samples.Calculator` (rid 1) with methods `.ctor` (rid 1),
/// `AddsTwoNumbers` (rid 2), `SubtractsTwoNumbers` (rid 3), and nested class `Edge`
/// (rid 2) with `HandlesOverflow` (rid 4).
pub fn build_test_assembly() -> Vec<u8> {
    let mut strings = vec![0_u8];
    let calculator = push_str(&mut strings, "Calculator");
    let samples = push_str(&mut strings, "Samples");
    let edge = push_str(&mut strings, "Edge");
    let ctor = push_str(&mut strings, ".ctor");
    let adds = push_str(&mut strings, "AddsTwoNumbers");
    let subtracts = push_str(&mut strings, "SubtractsTwoNumbers");
    let overflow = push_str(&mut strings, "HandlesOverflow");

    let mut tables = Vec::new();
    w32(&mut tables, 0); // reserved
    tables.push(2); // major
    tables.push(0); // minor
    tables.push(0); // small heaps
    tables.push(1); // reserved
    let valid = (1_u64 << 0x02) | (1_u64 << 0x06) | (1_u64 << 0x29);
    tables.extend_from_slice(&valid.to_le_bytes());
    tables.extend_from_slice(&0_u64.to_le_bytes()); // sorted
    w32(&mut tables, 2); // TypeDef rows
    w32(&mut tables, 4); // MethodDef rows
    w32(&mut tables, 1); // NestedClass rows

    // TypeDef rows: flags, name, namespace, extends, field_list, method_list
    w32(&mut tables, 0x0010_0001);
    w16(&mut tables, calculator as u16);
    w16(&mut tables, samples as u16);
    w16(&mut tables, 0);
    w16(&mut tables, 1);
    w16(&mut tables, 1);

    w32(&mut tables, 0x0010_0002); // nested public
    w16(&mut tables, edge as u16);
    w16(&mut tables, 0);
    w16(&mut tables, 0);
    w16(&mut tables, 1);
    w16(&mut tables, 4);

    // MethodDef rows: rva, impl_flags, flags, name, signature, param_list
    let methods: [(u32, u16, u32); 4] = [
        (0x2100, 0x1886, ctor), // specialname rtspecialname
        (0x2110, 0x0086, adds),
        (0x2120, 0x0086, subtracts),
        (0x2130, 0x0086, overflow),
    ];
    for (rva, flags, name) in methods {
        w32(&mut tables, rva);
        w16(&mut tables, 0);
        w16(&mut tables, flags);
        w16(&mut tables, name as u16);
        w16(&mut tables, 0);
        w16(&mut tables, 1);
    }

    // NestedClass row: Edge inside Calculator
    w16(&mut tables, 2);
    w16(&mut tables, 1);

    let metadata = metadata_image(&[("#~", &tables), ("#Strings", &strings)]);

    let mut payload = cor20_header(metadata.len() as u32);
    payload.extend_from_slice(&metadata);
    build_pe(&payload)
}

/// The standalone Portable PDB matching [`build_test_assembly`]: one document
/// `/src/Calculator.cs`, no debug records for the `.ctor`, and sequence points
/// starting at lines 10, 17 and 25 for the three test methods. The last method opens
/// with a hidden point.
pub fn build_test_pdb() -> Vec<u8> {
    let mut blob = vec![0_u8];
    let src_part = push_blob(&mut blob, b"src");
    let file_part = push_blob(&mut blob, b"Calculator.cs");

    let mut name_bytes = vec![b'/'];
    name_bytes.extend(compressed_uint(0)); // leading empty part roots the path
    name_bytes.extend(compressed_uint(src_part));
    name_bytes.extend(compressed_uint(file_part));
    let document_name = push_blob(&mut blob, &name_bytes);

    // il 0, one line, +20 columns, start 10:9
    let adds_points = push_blob(&mut blob, &[0x00, 0x00, 0x01, 0x28, 0x0A, 0x09]);
    // start 17:9
    let subtracts_points = push_blob(&mut blob, &[0x00, 0x00, 0x01, 0x28, 0x11, 0x09]);
    // hidden point first, then start 25:9
    let overflow_points = push_blob(
        &mut blob,
        &[0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x28, 0x19, 0x09],
    );

    let mut pdb_stream = Vec::new();
    pdb_stream.extend_from_slice(&[0x5A; 20]); // pdb id
    w32(&mut pdb_stream, 0); // no entry point
    let referenced = (1_u64 << 0x02) | (1_u64 << 0x06);
    pdb_stream.extend_from_slice(&referenced.to_le_bytes());
    w32(&mut pdb_stream, 2); // TypeDef rows in the assembly
    w32(&mut pdb_stream, 4); // MethodDef rows in the assembly

    let mut tables = Vec::new();
    w32(&mut tables, 0); // reserved
    tables.push(2);
    tables.push(0);
    tables.push(0); // small heaps
    tables.push(1);
    let valid = (1_u64 << 0x30) | (1_u64 << 0x31);
    tables.extend_from_slice(&valid.to_le_bytes());
    tables.extend_from_slice(&0_u64.to_le_bytes());
    w32(&mut tables, 1); // Document rows
    w32(&mut tables, 4); // MethodDebugInformation rows

    // Document row: name, hash_algorithm, hash, language (guid 1 = C#)
    w16(&mut tables, document_name as u16);
    w16(&mut tables, 0);
    w16(&mut tables, 0);
    w16(&mut tables, 1);

    // MethodDebugInformation rows: document, sequence_points
    let debug_rows: [(u16, u32); 4] = [
        (0, 0), // .ctor carries no debug information
        (1, adds_points),
        (1, subtracts_points),
        (1, overflow_points),
    ];
    for (document, points) in debug_rows {
        w16(&mut tables, document);
        w16(&mut tables, points as u16);
    }

    // guid 1: the C# language guid, 3f5162f8-07c6-11d3-9053-00c04fa302a1
    let guids: [u8; 16] = [
        0xF8, 0x62, 0x51, 0x3F, 0xC6, 0x07, 0xD3, 0x11, 0x90, 0x53, 0x00, 0xC0, 0x4F, 0xA3, 0x02,
        0xA1,
    ];

    metadata_image(&[
        ("#Pdb", &pdb_stream),
        ("#~", &tables),
        ("#Blob", &blob),
        ("#GUID", &guids),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_sizes() {
        assert!(build_net_binary().len() >= 0x400);
        assert!(build_test_assembly().len() >= 0x400);
        assert_eq!(&build_test_pdb()[..4], b"BSJB");
    }
}
