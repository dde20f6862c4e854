/*!
 * Session Tests
 * Shell-style workflows against an in-memory tree
 */

use pretty_assertions::assert_eq;

use simfs::vfs::{EntityType, Session, VfsError};

fn names(session: &Session, path: &str) -> Vec<String> {
    session
        .list_directory(path, false)
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

#[test]
fn test_create_file_in_subdirectory() {
    let mut session = Session::new();

    session.make_directory("home").unwrap();
    session.change_directory("home").unwrap();
    session.touch("a.txt").unwrap();

    assert_eq!(session.print_working_directory().unwrap(), "/home");

    session.change_directory("/").unwrap();
    assert_eq!(session.find("a.txt", true).unwrap(), vec!["/home/a.txt"]);
}

#[test]
fn test_duplicate_directory_rejected() {
    let mut session = Session::new();
    session.make_directory("docs").unwrap();

    let err = session.make_directory("docs").unwrap_err();
    assert_eq!(err, VfsError::DuplicateName("/docs".into()));
    assert_eq!(session.list_current_directory(false).unwrap().len(), 1);
}

#[test]
fn test_missing_path_keeps_cursor() {
    let mut session = Session::new();
    session.make_directory("home").unwrap();
    session.change_directory("home").unwrap();

    assert!(matches!(
        session.change_directory("does/not/exist"),
        Err(VfsError::PathNotFound(_))
    ));
    assert_eq!(session.print_working_directory().unwrap(), "/home");
}

#[test]
fn test_nested_navigation() {
    let mut session = Session::new();
    session.make_directories("/pics/holiday").unwrap();
    session.change_directory("/pics/holiday").unwrap();
    session.create_file("beach.jpg", [0u8; 16]).unwrap();

    session.change_directory("/").unwrap();
    session.change_directory("pics/holiday").unwrap();
    assert_eq!(session.print_working_directory().unwrap(), "/pics/holiday");

    session.change_directory("..").unwrap();
    assert_eq!(session.print_working_directory().unwrap(), "/pics");

    session.change_directory("../..").unwrap();
    assert_eq!(session.print_working_directory().unwrap(), "/");
}

#[test]
fn test_strict_then_recursive_removal() {
    let mut session = Session::new();
    session.make_directories("pics/holiday").unwrap();
    session.change_directory("pics/holiday").unwrap();
    session.create_file("beach.jpg", "jpeg").unwrap();
    session.change_directory("/").unwrap();

    assert_eq!(
        session.remove_directory("pics"),
        Err(VfsError::DirectoryNotEmpty("/pics".into()))
    );
    assert_eq!(session.find("beach.jpg", true).unwrap().len(), 1);

    assert_eq!(session.remove_directory_recursive("pics").unwrap(), 3);
    assert!(session.find("beach.jpg", true).unwrap().is_empty());
    assert_eq!(session.tree().used_bytes(), 0);
}

#[test]
fn test_file_content_lifecycle() {
    let mut session = Session::new();
    session.create_file("log.txt", "").unwrap();

    session.write_file("log.txt", "first\n").unwrap();
    session.append_to_file("log.txt", "second\n").unwrap();
    assert_eq!(session.read_to_string("log.txt").unwrap(), "first\nsecond\n");
    assert_eq!(session.stat("log.txt").unwrap().size, 13);

    session.write_file("log.txt", "").unwrap();
    assert!(session.read_file("log.txt").unwrap().is_empty());
    assert_eq!(session.tree().used_bytes(), 0);
}

#[test]
fn test_content_operations_on_missing_or_wrong_type() {
    let mut session = Session::new();
    session.make_directory("dir").unwrap();
    session.create_symlink("link", "dir").unwrap();

    assert!(matches!(session.read_file("nope"), Err(VfsError::NotFound(_))));
    assert!(matches!(
        session.write_file("nope", "x"),
        Err(VfsError::NotFound(_))
    ));
    assert!(matches!(
        session.append_to_file("nope", "x"),
        Err(VfsError::NotFound(_))
    ));
    assert!(matches!(
        session.read_file("dir"),
        Err(VfsError::WrongEntityType(_))
    ));
    assert!(matches!(
        session.read_file("link"),
        Err(VfsError::WrongEntityType(_))
    ));
}

#[test]
fn test_remove_file_refuses_directories() {
    let mut session = Session::new();
    session.make_directory("dir").unwrap();
    session.create_file("f", "x").unwrap();
    session.create_symlink("l", "f").unwrap();

    assert!(matches!(
        session.remove_file("dir"),
        Err(VfsError::WrongEntityType(_))
    ));
    session.remove_file("f").unwrap();
    session.remove_file("l").unwrap();
    assert_eq!(names(&session, "/"), vec!["dir"]);

    assert!(matches!(session.remove_file("f"), Err(VfsError::NotFound(_))));
}

#[test]
fn test_remove_directory_refuses_files() {
    let mut session = Session::new();
    session.create_file("f", "x").unwrap();

    assert!(matches!(
        session.remove_directory("f"),
        Err(VfsError::NotADirectory(_))
    ));
    assert!(matches!(
        session.remove_directory_recursive("f"),
        Err(VfsError::NotADirectory(_))
    ));
}

#[test]
fn test_listing_is_sorted_and_detailed() {
    let mut session = Session::new();
    session.create_file("zeta", "12").unwrap();
    session.make_directory("alpha").unwrap();
    session.create_symlink("mid", "/alpha").unwrap();

    let entries = session.list_current_directory(true).unwrap();
    let listed: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.entity_type))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("alpha", EntityType::Directory),
            ("mid", EntityType::Symlink),
            ("zeta", EntityType::File),
        ]
    );

    let zeta = entries[2].metadata.as_ref().unwrap();
    assert_eq!(zeta.size, 2);
    assert_eq!(zeta.path, "/zeta");
    let link = entries[1].metadata.as_ref().unwrap();
    assert_eq!(link.target.as_deref(), Some("/alpha"));

    assert!(session
        .list_current_directory(false)
        .unwrap()
        .iter()
        .all(|e| e.metadata.is_none()));
}

#[test]
fn test_list_directory_errors() {
    let mut session = Session::new();
    session.create_file("f", "").unwrap();

    assert!(matches!(
        session.list_directory("missing", false),
        Err(VfsError::PathNotFound(_))
    ));
    assert!(matches!(
        session.list_directory("f", false),
        Err(VfsError::PathNotFound(_))
    ));
}

#[test]
fn test_display_tree_renders_subtree() {
    let mut session = Session::new();
    session.make_directories("docs/drafts").unwrap();
    session.change_directory("docs").unwrap();
    session.create_file("a.txt", "hello").unwrap();
    session.create_symlink("latest", "drafts").unwrap();

    let expected = "\
docs/ (3 items)
├── a.txt (5 bytes)
├── drafts/ (0 items)
└── latest -> drafts
";
    assert_eq!(session.display_tree(None).unwrap(), expected);
    assert!(session
        .display_tree(Some("/"))
        .unwrap()
        .starts_with("/ (1 item)\n└── docs/ (3 items)\n"));
    assert!(matches!(
        session.display_tree(Some("nowhere")),
        Err(VfsError::PathNotFound(_))
    ));
}

#[test]
fn test_find_searches_from_cursor() {
    let mut session = Session::new();
    session.make_directories("a/b").unwrap();
    session.make_directories("c").unwrap();
    session.change_directory("a").unwrap();
    session.create_file("target", "").unwrap();
    session.change_directory("b").unwrap();
    session.create_file("target", "").unwrap();
    session.change_directory("/c").unwrap();
    session.create_file("target", "").unwrap();

    session.change_directory("/a").unwrap();
    assert_eq!(
        session.find("target", true).unwrap(),
        vec!["/a/b/target", "/a/target"]
    );
    assert_eq!(session.find("target", false).unwrap(), vec!["/a/target"]);
    assert_eq!(session.find_in("/", "target", true).unwrap().len(), 3);
    assert!(session.find("absent", true).unwrap().is_empty());
}

#[test]
fn test_rename_and_move() {
    let mut session = Session::new();
    session.make_directories("src").unwrap();
    session.make_directories("dst").unwrap();
    session.create_file("draft", "text").unwrap();

    session.rename("draft", "final").unwrap();
    assert!(matches!(session.read_file("draft"), Err(VfsError::NotFound(_))));

    assert_eq!(session.move_entry("final", "dst").unwrap(), "/dst/final");
    assert_eq!(session.find_in("/", "final", true).unwrap(), vec!["/dst/final"]);

    session.create_file("final", "again").unwrap();
    assert!(matches!(
        session.move_entry("final", "/dst"),
        Err(VfsError::DuplicateName(_))
    ));
    assert!(matches!(
        session.move_entry("src", "/src"),
        Err(VfsError::InvalidArgument(_))
    ));
    assert!(matches!(
        session.rename("src", "dst"),
        Err(VfsError::DuplicateName(_))
    ));
}

#[test]
fn test_stat_disk_usage_and_snapshot() {
    let mut session = Session::new();
    session.make_directories("data/raw").unwrap();
    session.change_directory("data").unwrap();
    session.create_file("a", "12345").unwrap();
    session.change_directory("raw").unwrap();
    session.create_file("b", "678").unwrap();
    session.change_directory("/").unwrap();

    assert_eq!(session.disk_usage(Some("data")).unwrap(), 8);
    assert_eq!(session.disk_usage(None).unwrap(), 8);

    let meta = session.stat("/data").unwrap();
    assert!(meta.is_dir());
    assert_eq!(meta.size, 8);
    assert_eq!(meta.child_count, Some(2));
    assert!(matches!(session.stat("/data/zzz"), Err(VfsError::PathNotFound(_))));

    let snapshot = session.snapshot(Some("data")).unwrap();
    assert_eq!(snapshot.path, "/data");
    assert_eq!(snapshot.children.len(), 2);
}

#[test]
fn test_capacity_failure_leaves_tree_unchanged() {
    let mut session = Session::from_tree(simfs::Tree::with_capacity(8));
    session.create_file("a", "1234").unwrap();

    assert_eq!(session.create_file("b", "123456"), Err(VfsError::OutOfSpace));
    assert_eq!(session.append_to_file("a", "56789"), Err(VfsError::OutOfSpace));
    assert_eq!(session.read_to_string("a").unwrap(), "1234");
    assert_eq!(names(&session, "/"), vec!["a"]);

    session.append_to_file("a", "5678").unwrap();
    assert_eq!(session.tree().used_bytes(), 8);
}

#[test]
fn test_remove_very_deep_directory() {
    let mut session = Session::new();
    for _ in 0..10_000 {
        session.make_directory("d").unwrap();
        session.change_directory("d").unwrap();
    }
    session.create_file("leaf", "deep").unwrap();
    assert_eq!(session.file_system_info().unwrap().size, 4);

    session.go_home();
    assert!(matches!(session.snapshot(None), Err(VfsError::InvalidArgument(_))));

    assert_eq!(session.remove_directory_recursive("d").unwrap(), 10_001);
    assert!(session.tree().is_empty());
    assert_eq!(session.tree().used_bytes(), 0);
    assert_eq!(session.file_system_info().unwrap().child_count, 0);
}

#[test]
fn test_file_system_info_reports_cursor() {
    let mut session = Session::new();
    session.make_directories("/home/user").unwrap();
    session.change_directory("/home/user").unwrap();
    session.create_file("notes", "0123456789").unwrap();
    session.create_symlink("latest", "notes").unwrap();

    let info = session.file_system_info().unwrap();
    assert_eq!(info.working_directory, "/home/user");
    assert_eq!(info.size, 15);
    assert_eq!(info.child_count, 2);
    assert!(info.to_string().contains("Current Directory Size: 15 bytes"));

    session.go_up().unwrap();
    assert_eq!(session.file_system_info().unwrap().child_count, 1);
}
