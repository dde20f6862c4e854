/*!
 * Host I/O Tests
 * Export to and import from host storage
 */

use std::fs;

use tempfile::TempDir;

use simfs::vfs::{Session, VfsError};

#[test]
fn test_export_then_import_round_trip() {
    let temp = TempDir::new().unwrap();
    let host = temp.path().join("out.txt");

    let mut session = Session::new();
    session.create_file("notes", "line one\nline two\n").unwrap();
    session.export_file("notes", &host).unwrap();
    assert_eq!(fs::read_to_string(&host).unwrap(), "line one\nline two\n");

    session.import_file("copy", &host).unwrap();
    assert_eq!(
        session.read_file("copy").unwrap(),
        session.read_file("notes").unwrap()
    );
}

#[test]
fn test_import_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let host = temp.path().join("in.bin");
    fs::write(&host, [1u8, 2, 3]).unwrap();

    let mut session = Session::new();
    let id = session.create_file("blob", "old content").unwrap();
    assert_eq!(session.import_file("blob", &host).unwrap(), id);
    assert_eq!(session.read_file("blob").unwrap(), vec![1, 2, 3]);
    assert_eq!(session.tree().used_bytes(), 3);
}

#[test]
fn test_failed_import_leaves_tree_unchanged() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.txt");

    let mut session = Session::new();
    session.create_file("keep", "original").unwrap();

    assert!(matches!(
        session.import_file("keep", &missing),
        Err(VfsError::IoError(_))
    ));
    assert_eq!(session.read_to_string("keep").unwrap(), "original");

    assert!(matches!(
        session.import_file("fresh", &missing),
        Err(VfsError::IoError(_))
    ));
    assert!(matches!(session.read_file("fresh"), Err(VfsError::NotFound(_))));
}

#[test]
fn test_export_errors() {
    let temp = TempDir::new().unwrap();
    let mut session = Session::new();
    session.make_directory("dir").unwrap();

    assert!(matches!(
        session.export_file("absent", &temp.path().join("x")),
        Err(VfsError::NotFound(_))
    ));
    assert!(matches!(
        session.export_file("dir", &temp.path().join("x")),
        Err(VfsError::WrongEntityType(_))
    ));
    session.create_file("f", "x").unwrap();
    assert!(matches!(
        session.export_file("f", &temp.path().join("no/such/dir/x")),
        Err(VfsError::IoError(_))
    ));
}
