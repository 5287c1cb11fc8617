//! Integration tests for PcsConverter file I/O

use crate::test_helpers::SOLVER_PCS;
use pcs_rs::convention::forbidden_path;
use pcs_rs::{Convention, ExportOptions, PcsConverter, PcsError};
use std::fs;
use tempfile::tempdir;

fn loaded() -> PcsConverter {
    let mut converter = PcsConverter::new();
    converter.parse(SOLVER_PCS, Convention::Smac).unwrap();
    converter
}

#[test]
fn test_native_round_trip() {
    let dir = tempdir().unwrap();
    let source = loaded();

    for file in ["space.yaml", "space.json"] {
        let path = dir.path().join(file);
        let warnings = source.export(&path, Convention::ConfigSpace).unwrap();
        assert!(warnings.is_empty());

        let mut reloaded = PcsConverter::new();
        reloaded.load(&path, Convention::ConfigSpace).unwrap();
        assert_eq!(reloaded.space(), source.space(), "{}", file);
    }
}

#[test]
fn test_load_smac_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.pcs");
    fs::write(&path, SOLVER_PCS).unwrap();

    let mut converter = PcsConverter::new();
    converter.load(&path, Convention::Smac).unwrap();
    assert_eq!(converter.space(), loaded().space());
}

#[test]
fn test_irace_export_writes_forbidden_sibling() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parameters.txt");

    let warnings = loaded().export(&path, Convention::Irace).unwrap();
    assert_eq!(warnings.len(), 1);

    let table = fs::read_to_string(&path).unwrap();
    let header = ExportOptions::default().header;
    assert!(table.starts_with(&format!("{}\n# name", header)));

    let sibling = dir.path().join("parameters_forbidden.txt");
    assert_eq!(forbidden_path(&path), sibling);
    assert_eq!(
        fs::read_to_string(sibling).unwrap(),
        "(x = 1) & (y = b)\n"
    );
}

#[test]
fn test_failed_forbidden_write_removes_the_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("parameters.txt");
    // A directory in place of the sibling file makes its write fail.
    fs::create_dir(dir.path().join("parameters_forbidden.txt")).unwrap();

    assert!(matches!(
        loaded().export(&path, Convention::Irace),
        Err(PcsError::Io(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_paramils_export_is_idempotent() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    let converter = loaded();
    let warnings = converter.export(&first, Convention::ParamIls).unwrap();
    assert_eq!(warnings.len(), 1);
    converter.export(&second, Convention::ParamIls).unwrap();

    assert_eq!(
        fs::read(&first).unwrap(),
        fs::read(&second).unwrap()
    );
    assert!(!dir.path().join("first_forbidden.txt").exists());
}

#[test]
fn test_custom_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.txt");

    let options = ExportOptions {
        header: "# generated for the nightly sweep".to_string(),
        ..ExportOptions::default()
    };
    let mut converter = PcsConverter::with_options(options);
    converter.parse(SOLVER_PCS, Convention::Smac).unwrap();
    converter.export(&path, Convention::ParamIls).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next(), Some("# generated for the nightly sweep"));
}

#[test]
fn test_unsupported_requests() {
    let dir = tempdir().unwrap();
    let converter = loaded();

    assert!(matches!(
        converter.export(dir.path().join("space.toml"), Convention::ConfigSpace),
        Err(PcsError::UnsupportedFileType { .. })
    ));
    assert!(matches!(
        converter.export(dir.path().join("space.pcs"), Convention::Smac),
        Err(PcsError::UnsupportedConvention { .. })
    ));

    let mut other = PcsConverter::new();
    assert!(matches!(
        other.load(dir.path().join("missing.pcs"), Convention::Smac),
        Err(PcsError::Io(_))
    ));
    assert!(matches!(
        other.load(dir.path().join("params.txt"), Convention::ParamIls),
        Err(PcsError::UnsupportedConvention { .. })
    ));
}

#[test]
fn test_configuration_space_from_converter() {
    let report = loaded().build_configuration_space().unwrap();
    assert_eq!(report.space.len(), 4);
    assert_eq!(report.warnings.len(), 1);
}
