use std::fs;

use folio_engine::{ensure_output_dir, PageWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("pages");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_file_as_output_dir() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn binary_payload_is_written_byte_for_byte() {
    let temp = TempDir::new().unwrap();
    let writer = PageWriter::new(temp.path().to_path_buf());
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let path = writer.write("book_001.jpg", &payload).unwrap();
    assert_eq!(path, temp.path().join("book_001.jpg"));
    assert_eq!(fs::read(&path).unwrap(), payload);
}

#[test]
fn rewrite_replaces_previous_copy() {
    let temp = TempDir::new().unwrap();
    let writer = PageWriter::new(temp.path().to_path_buf());

    let first = writer.write("book_001.jpg", b"first").unwrap();
    let second = writer.write("book_001.jpg", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");

    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = PageWriter::new(file_path.clone());
    assert!(writer.write("book_001.jpg", b"data").is_err());
    assert!(!file_path.with_file_name("book_001.jpg").exists());
}

#[test]
fn names_escaping_the_output_dir_are_refused() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("pages");
    fs::create_dir(&out).unwrap();
    let writer = PageWriter::new(out.clone());

    for name in ["../book_001.jpg", "/tmp/book_001.jpg", "vol/../../book_001.jpg", ""] {
        let err = writer.write(name, b"data").unwrap_err();
        assert!(
            matches!(err, PersistError::OutsideOutputDir(_)),
            "{name:?} gave {err}"
        );
    }
    assert!(!temp.path().join("book_001.jpg").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn existing_subdirectory_is_allowed() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("vol1")).unwrap();
    let writer = PageWriter::new(temp.path().to_path_buf());

    let path = writer.write("vol1/book_001.jpg", b"data").unwrap();
    assert_eq!(path, temp.path().join("vol1").join("book_001.jpg"));
}
