use std::fs;

use sitegen_engine::{ensure_output_dir, prepare_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn prepare_clears_previous_output() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("stale/nested")).unwrap();
    fs::write(out.join("stale/nested/old.html"), "old").unwrap();

    prepare_output_dir(&out).unwrap();

    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn prepare_rejects_a_file_in_the_way() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("out");
    fs::write(&file, "x").unwrap();
    assert!(matches!(
        prepare_output_dir(&file),
        Err(PersistError::OutputDir(_))
    ));
}

#[test]
fn atomic_write_creates_nested_dirs_and_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("docs/guide/index.html", b"hello").unwrap();
    assert_eq!(first, temp.path().join("docs").join("guide").join("index.html"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("/docs\\guide\\index.html", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn writes_outside_the_root_are_rejected() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");
    let writer = AtomicFileWriter::new(root.clone());

    let result = writer.write("../escape.html", b"data");
    assert!(matches!(result, Err(PersistError::InvalidPath(_))));
    assert!(!temp.path().join("escape.html").exists());
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.html", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.html").exists());
}
