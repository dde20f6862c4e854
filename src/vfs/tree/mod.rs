/*!
 * In-Memory Tree Filesystem
 * Arena-backed hierarchy of directories, files, and symlinks
 *
 * Nodes live in a generational arena and are addressed by [`NodeId`].
 * Directories own their children through handle maps; each node keeps a
 * plain parent handle for `..` navigation and path reconstruction, so there
 * is no reference cycle between parents and children.
 */

mod dir_ops;
mod entity;
mod entity_ops;
mod file_ops;
mod node;
mod resolve;
mod walk;

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::types::*;
use crate::core::config::FsConfig;
use crate::core::limits::MAX_NAME_LEN;
use node::{Node, NodeKind};

pub use dir_ops::Listing;
pub use entity::{Entity, EntityKind, EntitySnapshot, Subtree};
pub use walk::{TreeCounts, Walk};

pub(crate) use file_ops::read_external;

/// Handle to a node attached to a [`Tree`]
///
/// Handles are generational: once a node is removed, its handle is stale and
/// every operation given it fails with [`VfsError::NotFound`], even after the
/// arena slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Issues strictly increasing timestamps, at least 1µs apart
///
/// Stamps are truncated to whole microseconds so they survive the
/// microsecond serialization unchanged.
#[derive(Debug, Clone)]
struct Clock {
    last: SystemTime,
}

impl Clock {
    fn new() -> Self {
        Self { last: UNIX_EPOCH }
    }

    fn tick(&mut self) -> SystemTime {
        let floor = self.last + Duration::from_micros(1);
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        let now = UNIX_EPOCH + Duration::from_micros(micros);
        let next = if now > floor { now } else { floor };
        self.last = next;
        next
    }
}

/// In-memory filesystem tree
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    clock: Clock,
    live: usize,
    used_bytes: usize,
    capacity: Option<usize>,
    max_name_len: usize,
}

impl Tree {
    /// Create a tree holding only the root directory
    pub fn new() -> Self {
        let mut clock = Clock::new();
        let now = clock.tick();
        let root = Node {
            name: String::from("/"),
            parent: None,
            created: now,
            modified: now,
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        };

        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            clock,
            live: 1,
            used_bytes: 0,
            capacity: None,
            max_name_len: MAX_NAME_LEN,
        }
    }

    /// Create with a content capacity in bytes
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.capacity = Some(capacity);
        tree
    }

    /// Create from configuration
    pub fn with_config(config: &FsConfig) -> Self {
        let mut tree = Self::new();
        tree.capacity = config.capacity;
        tree.max_name_len = config.max_name_len;
        tree
    }

    /// Handle of the root directory
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of attached nodes, root included
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.live == 1
    }

    /// True if the handle refers to an attached node
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Total file-content bytes stored in the tree
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Content capacity, if limited
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Maximum entity name length accepted by this tree
    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    pub(in crate::vfs::tree) fn node(&self, id: NodeId) -> VfsResult<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| VfsError::NotFound(format!("stale node handle {}", id)))
    }

    pub(in crate::vfs::tree) fn node_mut(&mut self, id: NodeId) -> VfsResult<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| VfsError::NotFound(format!("stale node handle {}", id)))
    }

    /// Place a node in the arena, reusing a free slot when one exists
    fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Take a node out of the arena and invalidate its handle
    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    pub(super) fn tick(&mut self) -> SystemTime {
        self.clock.tick()
    }

    /// Reserve content bytes against the capacity
    pub(super) fn reserve(&mut self, additional: usize) -> VfsResult<()> {
        let total = self
            .used_bytes
            .checked_add(additional)
            .ok_or(VfsError::OutOfSpace)?;
        if let Some(max) = self.capacity {
            if total > max {
                return Err(VfsError::OutOfSpace);
            }
        }
        self.used_bytes = total;
        Ok(())
    }

    /// Account for a content resize from `old_len` to `new_len`
    pub(super) fn resize_accounting(&mut self, old_len: usize, new_len: usize) -> VfsResult<()> {
        if new_len > old_len {
            self.reserve(new_len - old_len)
        } else {
            self.used_bytes -= old_len - new_len;
            Ok(())
        }
    }

    pub(super) fn release_bytes(&mut self, amount: usize) {
        self.used_bytes = self.used_bytes.saturating_sub(amount);
    }

    /// Full path for error context; stale handles render as the handle itself
    pub(super) fn describe(&self, id: NodeId) -> String {
        self.full_path(id).unwrap_or_else(|_| id.to_string())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
