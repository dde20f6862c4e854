/*!
 * Shared Tree Tests
 * Multiple sessions and threads over one tree
 */

use std::thread;

use simfs::vfs::{SharedTree, Tree, VfsError};

#[test]
fn test_concurrent_sessions_create_distinct_files() {
    let shared = SharedTree::new(Tree::new());
    shared.session().make_directory("inbox").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let mut session = shared.session();
            thread::spawn(move || {
                session.change_directory("/inbox").unwrap();
                for i in 0..25 {
                    session
                        .create_file(&format!("w{}-{}", worker, i), "data")
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let session = shared.session();
    assert_eq!(session.list_directory("/inbox", false).unwrap().len(), 200);
    assert_eq!(session.disk_usage(Some("/inbox")).unwrap(), 800);
    assert_eq!(shared.read().used_bytes(), 800);
}

#[test]
fn test_racing_creates_one_winner() {
    let shared = SharedTree::default();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mut session = shared.session();
            thread::spawn(move || session.make_directory("contended"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, VfsError::DuplicateName(_))));
}

#[test]
fn test_cursors_are_independent() {
    let shared = SharedTree::default();
    let mut first = shared.session();
    let mut second = shared.session();

    first.make_directories("/a/b").unwrap();
    first.change_directory("/a/b").unwrap();
    second.change_directory("/a").unwrap();

    assert_eq!(first.print_working_directory().unwrap(), "/a/b");
    assert_eq!(second.print_working_directory().unwrap(), "/a");
    assert_ne!(first.id(), second.id());
}

#[test]
fn test_moved_cursor_follows_its_directory() {
    let shared = SharedTree::default();
    let mut mover = shared.session();
    let mut resident = shared.session();

    mover.make_directories("/old/work").unwrap();
    mover.make_directory("new").unwrap();
    resident.change_directory("/old/work").unwrap();

    mover.change_directory("/old").unwrap();
    mover.move_entry("work", "/new").unwrap();

    assert_eq!(resident.print_working_directory().unwrap(), "/new/work");
}
