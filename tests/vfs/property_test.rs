/*!
 * Tree Property Tests
 * Structural invariants under arbitrary operation sequences
 */

use std::collections::HashSet;

use proptest::prelude::*;

use simfs::vfs::{Entity, NodeId, Tree, VfsError};

/// One step of a random workload
#[derive(Debug, Clone)]
enum Op {
    MakeDir { dir: usize, name: String },
    MakeFile { dir: usize, name: String, size: usize },
    Remove { dir: usize, name: String },
    Move { node: usize, dir: usize },
}

/// Short names from a small alphabet so collisions actually happen
fn name() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), name()).prop_map(|(dir, name)| Op::MakeDir { dir, name }),
        (any::<usize>(), name(), 0usize..64)
            .prop_map(|(dir, name, size)| Op::MakeFile { dir, name, size }),
        (any::<usize>(), name()).prop_map(|(dir, name)| Op::Remove { dir, name }),
        (any::<usize>(), any::<usize>()).prop_map(|(node, dir)| Op::Move { node, dir }),
    ]
}

fn directories(tree: &Tree) -> Vec<NodeId> {
    let root = tree.root();
    let mut dirs = vec![root];
    dirs.extend(
        tree.walk(root)
            .unwrap()
            .map(|(_, id)| id)
            .filter(|&id| tree.is_dir(id).unwrap()),
    );
    dirs
}

fn all_nodes(tree: &Tree) -> Vec<NodeId> {
    let root = tree.root();
    std::iter::once(root)
        .chain(tree.walk(root).unwrap().map(|(_, id)| id))
        .collect()
}

/// Apply a workload, ignoring operations the tree rejects
fn build(ops: &[Op]) -> Tree {
    let mut tree = Tree::new();
    for op in ops {
        let dirs = directories(&tree);
        let pick = |i: usize| dirs[i % dirs.len()];
        let _ = match op {
            Op::MakeDir { dir, name } => Entity::directory(name.as_str())
                .and_then(|e| tree.add_child(pick(*dir), e))
                .map(|_| ()),
            Op::MakeFile { dir, name, size } => Entity::file(name.as_str(), vec![b'x'; *size])
                .and_then(|e| tree.add_child(pick(*dir), e))
                .map(|_| ()),
            Op::Remove { dir, name } => tree.remove_child(pick(*dir), name).map(|_| ()),
            Op::Move { node, dir } => {
                let nodes = all_nodes(&tree);
                tree.move_node(nodes[node % nodes.len()], pick(*dir))
            }
        };
    }
    tree
}

fn expected_size(tree: &Tree, id: NodeId) -> u64 {
    if tree.is_dir(id).unwrap() {
        tree.list_children(id, false)
            .unwrap()
            .map(|entry| expected_size(tree, tree.child(id, &entry.name).unwrap()))
            .sum()
    } else {
        tree.size(id).unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_sibling_names_unique(ops in prop::collection::vec(op(), 0..60)) {
        let tree = build(&ops);
        for dir in directories(&tree) {
            let names: Vec<String> = tree
                .list_children(dir, false)
                .unwrap()
                .map(|e| e.name)
                .collect();
            let unique: HashSet<&String> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());
            prop_assert_eq!(names.len(), tree.child_count(dir).unwrap());
        }
    }

    #[test]
    fn test_full_path_round_trip(ops in prop::collection::vec(op(), 0..60)) {
        let tree = build(&ops);
        let root = tree.root();
        for id in all_nodes(&tree) {
            let path = tree.full_path(id).unwrap();
            prop_assert!(path.starts_with('/'));
            prop_assert_eq!(tree.resolve_entry(root, &path).unwrap(), id);
            if tree.is_dir(id).unwrap() {
                prop_assert_eq!(tree.resolve(root, &path).unwrap(), id);
            }
        }
    }

    #[test]
    fn test_directory_size_aggregates(ops in prop::collection::vec(op(), 0..60)) {
        let tree = build(&ops);
        for dir in directories(&tree) {
            prop_assert_eq!(tree.directory_size(dir).unwrap(), expected_size(&tree, dir));
        }
        prop_assert_eq!(
            tree.directory_size(tree.root()).unwrap(),
            tree.used_bytes() as u64
        );
    }

    #[test]
    fn test_parent_chains_reach_root(ops in prop::collection::vec(op(), 0..60)) {
        let tree = build(&ops);
        let root = tree.root();
        let nodes = all_nodes(&tree);
        prop_assert_eq!(nodes.len(), tree.len());

        for id in nodes {
            let mut seen = HashSet::new();
            let mut current = id;
            while let Some(parent) = tree.parent(current).unwrap() {
                prop_assert!(seen.insert(current), "cycle through {}", current);
                current = parent;
            }
            prop_assert_eq!(current, root);
        }
    }

    #[test]
    fn test_dot_segments(ops in prop::collection::vec(op(), 0..40)) {
        let tree = build(&ops);
        let root = tree.root();
        prop_assert_eq!(tree.resolve(root, "..").unwrap(), root);
        prop_assert_eq!(tree.resolve(root, "/../..").unwrap(), root);

        for dir in directories(&tree) {
            prop_assert_eq!(tree.resolve(dir, ".").unwrap(), dir);
            prop_assert_eq!(tree.resolve(dir, "./././").unwrap(), dir);
            let parent = tree.parent(dir).unwrap().unwrap_or(root);
            prop_assert_eq!(tree.resolve(dir, "..").unwrap(), parent);
        }
    }

    #[test]
    fn test_invalid_names_rejected(name in "[a-z]{0,3}/[a-z]{0,3}") {
        let mut tree = Tree::new();
        let root = tree.root();
        let result = Entity::directory(name.as_str()).and_then(|e| tree.add_child(root, e));
        prop_assert!(matches!(result, Err(VfsError::InvalidName(_))));
        prop_assert!(tree.is_empty());
    }
}
