/*!
 * Filesystem Session
 * Cursor-relative operations over a tree, as used by a shell or dispatcher
 */

use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use super::tree::{read_external, Entity, EntitySnapshot, NodeId, Tree};
use super::types::*;
use crate::core::config::FsConfig;
use crate::monitoring::OperationSpan;

/// Access to a tree, either owned or behind a lock
///
/// Sessions go through this trait for every operation, so the same session
/// logic drives a plain [`Tree`] and a [`SharedTree`](super::SharedTree).
pub trait TreeAccess {
    /// Run a read-only closure against the tree
    fn with_tree<R>(&self, f: impl FnOnce(&Tree) -> R) -> R;

    /// Run a mutating closure against the tree
    fn with_tree_mut<R>(&mut self, f: impl FnOnce(&mut Tree) -> R) -> R;
}

impl TreeAccess for Tree {
    fn with_tree<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(self)
    }

    fn with_tree_mut<R>(&mut self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(self)
    }
}

/// A tree paired with a current-directory cursor
///
/// Simple-name arguments refer to children of the cursor; path arguments go
/// through the resolver relative to the cursor. A failed operation leaves both
/// the tree and the cursor unchanged.
#[derive(Debug, Clone)]
pub struct Session<T: TreeAccess = Tree> {
    id: Uuid,
    tree: T,
    cwd: NodeId,
}

impl Session<Tree> {
    /// Session over a fresh, empty tree
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    /// Session over a fresh tree built from configuration
    pub fn with_config(config: &FsConfig) -> Self {
        Self::from_tree(Tree::with_config(config))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

impl Default for Session<Tree> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeAccess> Session<T> {
    /// Session over an existing tree, with the cursor at the root
    pub fn from_tree(tree: T) -> Self {
        let cwd = tree.with_tree(|t| t.root());
        Self {
            id: Uuid::new_v4(),
            tree,
            cwd,
        }
    }

    /// Session identifier used in trace output
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle of the current directory
    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    fn read<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Tree, NodeId) -> VfsResult<R>,
    ) -> VfsResult<R> {
        let span = OperationSpan::new(operation, &self.id);
        let cwd = self.cwd;
        span.finish(self.tree.with_tree(|tree| f(tree, cwd)))
    }

    fn write<R>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Tree, NodeId) -> VfsResult<R>,
    ) -> VfsResult<R> {
        let span = OperationSpan::new(operation, &self.id);
        let cwd = self.cwd;
        let result = self.tree.with_tree_mut(|tree| f(tree, cwd));
        if result.is_ok() {
            debug!(session = %self.id, operation, "Tree mutated");
        }
        span.finish(result)
    }

    /// Move the cursor; on failure the cursor stays where it was
    ///
    /// An empty path returns to the root, like [`Session::go_home`].
    pub fn change_directory(&mut self, path: &str) -> VfsResult<NodeId> {
        let target = self.read("cd", |tree, cwd| {
            if path.is_empty() {
                Ok(tree.root())
            } else {
                tree.resolve(cwd, path)
            }
        })?;
        self.cwd = target;
        debug!(session = %self.id, path, "Changed directory");
        Ok(target)
    }

    /// Move the cursor to its parent; fails at the root
    pub fn go_up(&mut self) -> VfsResult<NodeId> {
        let target = self.read("cd_up", |tree, cwd| {
            tree.parent(cwd)?.ok_or_else(|| {
                VfsError::InvalidArgument("already at the root directory".into())
            })
        })?;
        self.cwd = target;
        debug!(session = %self.id, "Changed directory to parent");
        Ok(target)
    }

    /// Move the cursor to the root
    pub fn go_home(&mut self) -> NodeId {
        self.cwd = self.tree.with_tree(|tree| tree.root());
        debug!(session = %self.id, "Changed directory to root");
        self.cwd
    }

    /// Absolute path of the cursor
    pub fn print_working_directory(&self) -> VfsResult<String> {
        self.read("pwd", |tree, cwd| tree.full_path(cwd))
    }

    pub fn make_directory(&mut self, name: &str) -> VfsResult<NodeId> {
        self.write("mkdir", |tree, cwd| tree.add_child(cwd, Entity::directory(name)?))
    }

    /// Create every missing directory along a path
    pub fn make_directories(&mut self, path: &str) -> VfsResult<NodeId> {
        self.write("mkdir_p", |tree, cwd| tree.create_dir_all(cwd, path))
    }

    /// Create a file with initial content (empty content is allowed)
    pub fn create_file(&mut self, name: &str, content: impl AsRef<[u8]>) -> VfsResult<NodeId> {
        let content = content.as_ref().to_vec();
        self.write("create", |tree, cwd| {
            tree.add_child(cwd, Entity::file(name, content)?)
        })
    }

    /// Create an inert symlink; the target is not checked
    pub fn create_symlink(&mut self, name: &str, target: &str) -> VfsResult<NodeId> {
        self.write("symlink", |tree, cwd| {
            tree.add_child(cwd, Entity::symlink(name, target)?)
        })
    }

    /// Create an empty file, or bump the modification time of an existing entry
    pub fn touch(&mut self, name: &str) -> VfsResult<NodeId> {
        self.write("touch", |tree, cwd| {
            validate_name(name, tree.max_name_len())?;
            match tree.child(cwd, name) {
                Ok(id) => tree.touch(id).map(|_| id),
                Err(VfsError::NotFound(_)) => tree.add_child(cwd, Entity::file(name, Vec::new())?),
                Err(e) => Err(e),
            }
        })
    }

    /// Remove a file or symlink
    pub fn remove_file(&mut self, name: &str) -> VfsResult<()> {
        self.write("rm", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            if tree.is_dir(id)? {
                return Err(VfsError::WrongEntityType(format!(
                    "{} is a directory",
                    tree.describe(id)
                )));
            }
            tree.remove_child(cwd, name).map(|_| ())
        })
    }

    /// Remove an empty directory
    pub fn remove_directory(&mut self, name: &str) -> VfsResult<()> {
        self.write("rmdir", |tree, cwd| {
            validate_name(name, tree.max_name_len())?;
            tree.remove_empty_directory(cwd, name)
        })
    }

    /// Remove a directory and its contents; returns the number of removed entries
    pub fn remove_directory_recursive(&mut self, name: &str) -> VfsResult<usize> {
        self.write("rm_r", |tree, cwd| {
            validate_name(name, tree.max_name_len())?;
            tree.remove_directory_recursive(cwd, name)
        })
    }

    /// Point an existing symlink at a new target
    pub fn set_symlink_target(&mut self, name: &str, target: &str) -> VfsResult<()> {
        self.write("retarget", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            tree.set_symlink_target(id, target)
        })
    }

    pub fn rename(&mut self, name: &str, new_name: &str) -> VfsResult<()> {
        self.write("rename", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            tree.rename(id, new_name)
        })
    }

    /// Move a child of the cursor under the directory at `dest`
    ///
    /// Returns the entry's new absolute path.
    pub fn move_entry(&mut self, name: &str, dest: &str) -> VfsResult<String> {
        self.write("mv", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            let target = tree.resolve(cwd, dest)?;
            tree.move_node(id, target)?;
            tree.full_path(id)
        })
    }

    pub fn list_current_directory(&self, detailed: bool) -> VfsResult<Vec<Entry>> {
        self.read("ls", |tree, cwd| Ok(tree.list_children(cwd, detailed)?.collect()))
    }

    pub fn list_directory(&self, path: &str, detailed: bool) -> VfsResult<Vec<Entry>> {
        self.read("ls", |tree, cwd| {
            let dir = tree.resolve(cwd, path)?;
            Ok(tree.list_children(dir, detailed)?.collect())
        })
    }

    /// Text tree of the directory at `path`, or of the cursor
    pub fn display_tree(&self, path: Option<&str>) -> VfsResult<String> {
        self.read("tree", |tree, cwd| {
            let dir = tree.resolve(cwd, path.unwrap_or("."))?;
            tree.display_tree(dir, "")
        })
    }

    /// Full paths of entries named `name` beneath the cursor
    pub fn find(&self, name: &str, recursive: bool) -> VfsResult<Vec<String>> {
        self.find_in(".", name, recursive)
    }

    /// Full paths of entries named `name` beneath the directory at `path`
    pub fn find_in(&self, path: &str, name: &str, recursive: bool) -> VfsResult<Vec<String>> {
        self.read("find", |tree, cwd| {
            let dir = tree.resolve(cwd, path)?;
            tree.find(dir, name, recursive)?
                .into_iter()
                .map(|id| tree.full_path(id))
                .collect()
        })
    }

    pub fn read_file(&self, name: &str) -> VfsResult<Vec<u8>> {
        self.read("read", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            Ok(tree.content(id)?.to_vec())
        })
    }

    /// Read a file as UTF-8 text
    pub fn read_to_string(&self, name: &str) -> VfsResult<String> {
        let bytes = self.read_file(name)?;
        String::from_utf8(bytes)
            .map_err(|e| VfsError::InvalidArgument(format!("{} is not valid UTF-8: {}", name, e)))
    }

    /// Replace the content of an existing file
    pub fn write_file(&mut self, name: &str, content: impl AsRef<[u8]>) -> VfsResult<()> {
        self.write("write", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            tree.set_content(id, content.as_ref())
        })
    }

    /// Append to an existing file
    pub fn append_to_file(&mut self, name: &str, text: impl AsRef<[u8]>) -> VfsResult<()> {
        self.write("append", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            tree.append_content(id, text.as_ref())
        })
    }

    /// Metadata of the entry at `path`
    pub fn stat(&self, path: &str) -> VfsResult<Metadata> {
        self.read("stat", |tree, cwd| {
            let id = tree.resolve_entry(cwd, path)?;
            tree.metadata(id)
        })
    }

    /// Recursive size of the directory at `path`, or of the cursor
    pub fn disk_usage(&self, path: Option<&str>) -> VfsResult<u64> {
        self.read("du", |tree, cwd| {
            let dir = tree.resolve(cwd, path.unwrap_or("."))?;
            tree.directory_size(dir)
        })
    }

    /// Path, recursive size, and child count of the cursor
    pub fn file_system_info(&self) -> VfsResult<FsInfo> {
        self.read("info", |tree, cwd| {
            Ok(FsInfo {
                working_directory: tree.full_path(cwd)?,
                size: tree.directory_size(cwd)?,
                child_count: tree.child_count(cwd)?,
            })
        })
    }

    /// Serializable snapshot of the entry at `path`, or of the cursor
    pub fn snapshot(&self, path: Option<&str>) -> VfsResult<EntitySnapshot> {
        self.read("snapshot", |tree, cwd| {
            let id = tree.resolve_entry(cwd, path.unwrap_or("."))?;
            tree.snapshot(id)
        })
    }

    /// Write a file's content to host storage
    pub fn export_file(&self, name: &str, host_path: &Path) -> VfsResult<()> {
        self.read("export", |tree, cwd| {
            let id = lookup(tree, cwd, name)?;
            tree.write_to_external_sink(id, host_path)
        })
    }

    /// Load a file's content from host storage, creating the file if missing
    pub fn import_file(&mut self, name: &str, host_path: &Path) -> VfsResult<NodeId> {
        self.write("import", |tree, cwd| match lookup(tree, cwd, name) {
            Ok(id) => tree.read_from_external_source(id, host_path).map(|_| id),
            Err(VfsError::NotFound(_)) => {
                let data = read_external(host_path)?;
                tree.add_child(cwd, Entity::file(name, data)?)
            }
            Err(e) => Err(e),
        })
    }
}

/// Validate a simple name and look it up under `dir`
fn lookup(tree: &Tree, dir: NodeId, name: &str) -> VfsResult<NodeId> {
    validate_name(name, tree.max_name_len())?;
    tree.child(dir, name)
}
