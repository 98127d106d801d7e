//! File-based tests of the navigation facade: a crafted assembly/PDB pair is written
//! to a temp directory and queried through the public API.

#[allow(dead_code)]
#[path = "../src/test/mod.rs"]
mod fixtures;

use std::path::{Path, PathBuf};

use dotnav::{Error, NavigationDataProvider};
use fixtures::{build_test_assembly, build_test_pdb};

fn write_fixture_pair(dir: &Path) -> PathBuf {
    let binary_path = dir.join("MathTests.dll");
    std::fs::write(&binary_path, build_test_assembly()).unwrap();
    std::fs::write(dir.join("MathTests.pdb"), build_test_pdb()).unwrap();
    binary_path
}

fn open_provider(dir: &Path) -> NavigationDataProvider {
    let binary_path = write_fixture_pair(dir);
    NavigationDataProvider::new(binary_path.to_str().unwrap()).unwrap()
}

#[test]
fn end_to_end_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let provider = open_provider(dir.path());

    let add = provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .unwrap();
    assert_eq!(add.file_path(), "/src/Calculator.cs");
    assert_eq!(add.min_line(), 10);

    let nested = provider
        .get_navigation_data("Samples.Calculator+Edge", "HandlesOverflow")
        .unwrap()
        .unwrap();
    assert_eq!(nested.min_line(), 25);

    // unknown methods and constructors are "not found", never an error
    assert!(provider
        .get_navigation_data("Samples.Calculator", "DoesNotExist")
        .unwrap()
        .is_none());
    assert!(provider
        .get_navigation_data("Samples.Calculator", ".ctor")
        .unwrap()
        .is_none());
    assert!(provider
        .get_navigation_data("No.Such.Type", "AddsTwoNumbers")
        .unwrap()
        .is_none());
}

#[test]
fn decorated_method_names_normalize() {
    let dir = tempfile::tempdir().unwrap();
    let provider = open_provider(dir.path());

    for reported in ["SubtractsTwoNumbers", "SubtractsTwoNumbers()", "SubtractsTwoNumbers( )"] {
        let data = provider
            .get_navigation_data("Samples.Calculator", reported)
            .unwrap()
            .unwrap();
        assert_eq!(data.min_line(), 17);
    }
}

#[test]
fn repeated_lookups_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let provider = open_provider(dir.path());

    let first = provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .cloned();
    let second = provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .cloned();
    assert_eq!(first, second);
}

#[test]
fn blank_arguments_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let provider = open_provider(dir.path());

    assert!(matches!(
        provider.get_navigation_data("", "AddsTwoNumbers"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        provider.get_navigation_data("   ", "AddsTwoNumbers"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        provider.get_navigation_data("Samples.Calculator", ""),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn missing_pdb_is_a_symbol_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let binary_path = dir.path().join("MathTests.dll");
    std::fs::write(&binary_path, build_test_assembly()).unwrap();

    let error = NavigationDataProvider::new(binary_path.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, Error::SymbolLoad { .. }));
}

#[test]
fn corrupt_files_are_a_symbol_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let binary_path = dir.path().join("MathTests.dll");
    std::fs::write(&binary_path, vec![0x13_u8; 1024]).unwrap();
    std::fs::write(dir.path().join("MathTests.pdb"), vec![0x37_u8; 1024]).unwrap();

    let error = NavigationDataProvider::new(binary_path.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, Error::SymbolLoad { .. }));
}

#[test]
fn close_is_idempotent_and_empties_the_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut provider = open_provider(dir.path());

    assert!(provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .is_some());

    provider.close();
    assert!(provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .is_none());

    provider.close();
    assert!(provider
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .is_none());
}

#[test]
fn providers_are_independent() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let mut provider_a = open_provider(dir_a.path());
    let provider_b = open_provider(dir_b.path());

    provider_a.close();

    assert!(provider_b
        .get_navigation_data("Samples.Calculator", "AddsTwoNumbers")
        .unwrap()
        .is_some());
}
