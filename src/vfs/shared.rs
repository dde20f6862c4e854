/*!
 * Shared Tree
 * One tree behind a reader-writer lock, with independent session cursors
 */

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::session::{Session, TreeAccess};
use super::tree::Tree;

/// Session whose tree is shared with other sessions
pub type SharedSession = Session<SharedTree>;

/// Cloneable handle to a tree shared between sessions and threads
///
/// Every session operation takes the lock once, so each operation is atomic
/// with respect to the others. A session whose cursor directory is removed by
/// another session sees `NotFound` until it changes directory by absolute path.
#[derive(Debug, Clone, Default)]
pub struct SharedTree {
    inner: Arc<RwLock<Tree>>,
}

impl SharedTree {
    pub fn new(tree: Tree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Open a new session with its cursor at the root
    pub fn session(&self) -> SharedSession {
        Session::from_tree(self.clone())
    }

    /// Lock the tree for reading
    pub fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.inner.read()
    }

    /// Lock the tree for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.inner.write()
    }

    /// Number of live handles to this tree
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl From<Tree> for SharedTree {
    fn from(tree: Tree) -> Self {
        Self::new(tree)
    }
}

impl TreeAccess for SharedTree {
    fn with_tree<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(&self.inner.read())
    }

    fn with_tree_mut<R>(&mut self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(&mut self.inner.write())
    }
}
