/*!
 * Directory Operations Implementation
 * Child registry: attach, detach, lookup, enumerate, and aggregate size
 */

use std::collections::{btree_map, BTreeMap};
use std::time::SystemTime;

use super::super::types::*;
use super::entity::{assemble, Entity, EntityKind, Stamps};
use super::node::{Node, NodeKind};
use super::{NodeId, Tree};

impl Tree {
    /// Look up a direct child by name
    pub fn child(&self, parent: NodeId, name: &str) -> VfsResult<NodeId> {
        self.children_of(parent)?
            .get(name)
            .copied()
            .ok_or_else(|| VfsError::NotFound(join(&self.describe(parent), name)))
    }

    /// Number of direct children
    pub fn child_count(&self, dir: NodeId) -> VfsResult<usize> {
        Ok(self.children_of(dir)?.len())
    }

    pub(super) fn children_of(&self, dir: NodeId) -> VfsResult<&BTreeMap<String, NodeId>> {
        self.node(dir)?
            .children()
            .ok_or_else(|| VfsError::NotADirectory(self.describe(dir)))
    }

    /// Attach an entity (and its whole subtree) under a directory
    ///
    /// Takes ownership of the entity, sets its parent back-reference, and
    /// returns the handle of the attached node. Sizes are derived on demand,
    /// so nothing is recomputed here.
    pub fn add_child(&mut self, parent: NodeId, entity: Entity) -> VfsResult<NodeId> {
        entity.validate_names(self.max_name_len)?;

        if self.children_of(parent)?.contains_key(entity.name()) {
            return Err(VfsError::DuplicateName(join(
                &self.describe(parent),
                entity.name(),
            )));
        }

        self.reserve(entity.content_bytes())?;

        let now = self.tick();
        let id = self.attach(parent, entity, now);
        self.node_mut(parent)?.modified = now;
        Ok(id)
    }

    /// Allocate nodes for an entity subtree and link them under `parent`
    ///
    /// Callers have already checked that `parent` is a live directory and that
    /// the name is free. Works from an explicit stack, so depth is unbounded.
    fn attach(&mut self, parent: NodeId, entity: Entity, now: SystemTime) -> NodeId {
        let mut pending = Vec::new();
        let top = self.attach_one(parent, entity, now, &mut pending);
        while let Some((dir, child)) = pending.pop() {
            self.attach_one(dir, child, now, &mut pending);
        }
        top
    }

    /// Attach a single entity, queueing its children for the caller
    fn attach_one(
        &mut self,
        parent: NodeId,
        entity: Entity,
        now: SystemTime,
        pending: &mut Vec<(NodeId, Entity)>,
    ) -> NodeId {
        let (name, stamps, kind) = entity.into_parts();
        let stamps = stamps.unwrap_or(Stamps {
            created: now,
            modified: now,
        });

        let (node_kind, children) = match kind {
            EntityKind::File { content } => (NodeKind::File { content }, None),
            EntityKind::Symlink { target } => (NodeKind::Symlink { target }, None),
            EntityKind::Directory { children } => (
                NodeKind::Directory {
                    children: BTreeMap::new(),
                },
                Some(children),
            ),
        };

        let id = self.alloc(Node {
            name: name.clone(),
            parent: Some(parent),
            created: stamps.created,
            modified: stamps.modified,
            kind: node_kind,
        });

        if let Some(children) = children {
            pending.extend(children.into_values().map(|child| (id, child)));
        }

        if let Ok(parent_node) = self.node_mut(parent) {
            if let Some(children) = parent_node.children_mut() {
                children.insert(name, id);
            }
        }
        id
    }

    /// Detach a child and hand its subtree back to the caller
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> VfsResult<Entity> {
        let id = self.child(parent, name)?;

        let now = self.tick();
        let parent_node = self.node_mut(parent)?;
        if let Some(children) = parent_node.children_mut() {
            children.remove(name);
        }
        parent_node.modified = now;

        let entity = self.detach(id).ok_or_else(|| {
            VfsError::NotFound(format!("stale node handle {}", id))
        })?;
        self.release_bytes(entity.content_bytes());
        Ok(entity)
    }

    /// Free a node and its descendants, rebuilding them as an owned entity
    fn detach(&mut self, id: NodeId) -> Option<Entity> {
        let mut released: Vec<(Option<usize>, Entity)> = Vec::new();
        let mut stack = vec![(None, id)];

        while let Some((parent, id)) = stack.pop() {
            let Some(node) = self.release(id) else {
                continue;
            };
            let index = released.len();
            let stamps = Stamps {
                created: node.created,
                modified: node.modified,
            };

            let kind = match node.kind {
                NodeKind::File { content } => EntityKind::File { content },
                NodeKind::Symlink { target } => EntityKind::Symlink { target },
                NodeKind::Directory { children } => {
                    stack.extend(children.into_values().map(|child| (Some(index), child)));
                    EntityKind::Directory {
                        children: BTreeMap::new(),
                    }
                }
            };
            released.push((parent, Entity::from_parts(node.name, stamps, kind)));
        }

        assemble(released)
    }

    /// Remove an empty subdirectory
    pub fn remove_empty_directory(&mut self, parent: NodeId, name: &str) -> VfsResult<()> {
        let id = self.child(parent, name)?;
        let count = self
            .node(id)?
            .children()
            .ok_or_else(|| VfsError::NotADirectory(self.describe(id)))?
            .len();
        if count > 0 {
            return Err(VfsError::DirectoryNotEmpty(self.describe(id)));
        }
        self.remove_child(parent, name).map(|_| ())
    }

    /// Remove a subdirectory and everything beneath it
    ///
    /// Returns the number of removed entities, the directory itself included.
    pub fn remove_directory_recursive(&mut self, parent: NodeId, name: &str) -> VfsResult<usize> {
        let id = self.child(parent, name)?;
        if !self.node(id)?.is_dir() {
            return Err(VfsError::NotADirectory(self.describe(id)));
        }
        let removed = self.remove_child(parent, name)?;
        Ok(removed.node_count())
    }

    /// Move a node under another directory; its handle stays valid
    ///
    /// Fails without changing anything if the destination already has an entry
    /// with the same name or lies inside the moved subtree.
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> VfsResult<()> {
        let old_parent = self
            .node(id)?
            .parent
            .ok_or_else(|| VfsError::InvalidArgument("the root directory cannot be moved".into()))?;
        let name = self.node(id)?.name.clone();

        if self.children_of(new_parent)?.contains_key(&name) {
            if old_parent == new_parent {
                return Ok(());
            }
            return Err(VfsError::DuplicateName(join(&self.describe(new_parent), &name)));
        }
        if self.is_ancestor(id, new_parent)? {
            return Err(VfsError::InvalidArgument(format!(
                "cannot move {} into its own subtree",
                self.describe(id)
            )));
        }

        let now = self.tick();
        if let Some(children) = self.node_mut(old_parent)?.children_mut() {
            children.remove(&name);
        }
        self.node_mut(old_parent)?.modified = now;

        let target = self.node_mut(new_parent)?;
        if let Some(children) = target.children_mut() {
            children.insert(name, id);
        }
        target.modified = now;

        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    /// Create every missing directory along a path (like `mkdir -p`)
    ///
    /// Existing directories are traversed; an existing non-directory entry on
    /// the way fails with `NotADirectory`. Returns the final directory.
    pub fn create_dir_all(&mut self, start: NodeId, path: &str) -> VfsResult<NodeId> {
        let mut current = if path.starts_with('/') {
            self.root
        } else {
            start
        };
        if !self.node(current)?.is_dir() {
            return Err(VfsError::NotADirectory(self.describe(current)));
        }

        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    current = self.node(current)?.parent.unwrap_or(current);
                }
                name => {
                    current = match self.children_of(current)?.get(name).copied() {
                        Some(existing) if self.node(existing)?.is_dir() => existing,
                        Some(existing) => {
                            return Err(VfsError::NotADirectory(self.describe(existing)))
                        }
                        None => self.add_child(current, Entity::directory(name)?)?,
                    };
                }
            }
        }
        Ok(current)
    }

    /// Lazily enumerate a directory's children in name order
    ///
    /// The returned [`Listing`] is `Clone`, so the sequence can be restarted.
    pub fn list_children(&self, dir: NodeId, detailed: bool) -> VfsResult<Listing<'_>> {
        Ok(Listing {
            tree: self,
            children: self.children_of(dir)?.iter(),
            detailed,
        })
    }

    /// Recursive sum of all descendant sizes
    ///
    /// Walks the whole subtree on every call; nothing is cached.
    pub fn directory_size(&self, dir: NodeId) -> VfsResult<u64> {
        let mut total = 0u64;
        let mut stack: Vec<NodeId> = self.children_of(dir)?.values().copied().collect();

        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            total += node.own_size();
            if let Some(children) = node.children() {
                stack.extend(children.values().copied());
            }
        }
        Ok(total)
    }
}

/// Lazy, restartable sequence of child summaries
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    tree: &'a Tree,
    children: btree_map::Iter<'a, String, NodeId>,
    detailed: bool,
}

impl Iterator for Listing<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            let (name, id) = self.children.next()?;
            let Ok(node) = self.tree.node(*id) else {
                continue;
            };
            let metadata = if self.detailed {
                self.tree.metadata(*id).ok()
            } else {
                None
            };
            return Some(Entry::new_unchecked(
                name.clone(),
                node.entity_type(),
                metadata,
            ));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.children.len()))
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}
