/*!
 * Entity Operations Implementation
 * Variant-independent metadata, naming, and path reconstruction
 */

use std::time::SystemTime;

use super::super::types::*;
use super::node::NodeKind;
use super::{NodeId, Tree};

impl Tree {
    pub fn name(&self, id: NodeId) -> VfsResult<&str> {
        Ok(&self.node(id)?.name)
    }

    pub fn entity_type(&self, id: NodeId) -> VfsResult<EntityType> {
        Ok(self.node(id)?.entity_type())
    }

    /// Parent handle; `None` for the root
    pub fn parent(&self, id: NodeId) -> VfsResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn created(&self, id: NodeId) -> VfsResult<SystemTime> {
        Ok(self.node(id)?.created)
    }

    pub fn modified(&self, id: NodeId) -> VfsResult<SystemTime> {
        Ok(self.node(id)?.modified)
    }

    pub fn is_dir(&self, id: NodeId) -> VfsResult<bool> {
        Ok(self.node(id)?.is_dir())
    }

    /// Size in bytes: content length for files, target length for symlinks,
    /// and the recursive sum of descendants for directories
    pub fn size(&self, id: NodeId) -> VfsResult<u64> {
        let node = self.node(id)?;
        if node.is_dir() {
            self.directory_size(id)
        } else {
            Ok(node.own_size())
        }
    }

    /// Absolute path rebuilt from the parent chain
    ///
    /// Cost is O(depth).
    pub fn full_path(&self, id: NodeId) -> VfsResult<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }

        if names.is_empty() {
            return Ok(String::from("/"));
        }

        let mut path = String::new();
        for name in names.iter().rev() {
            path.push('/');
            path.push_str(name);
        }
        Ok(path)
    }

    /// True if `ancestor` is `id` itself or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> VfsResult<bool> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return Ok(true);
            }
            current = self.node(node_id)?.parent;
        }
        Ok(false)
    }

    /// Rename a node in place; its handle stays valid
    ///
    /// Renaming to the current name only bumps the node's modification time.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> VfsResult<()> {
        validate_name(new_name, self.max_name_len)?;

        let parent = self.node(id)?.parent.ok_or_else(|| {
            VfsError::InvalidName("the root directory cannot be renamed".into())
        })?;
        let old_name = self.node(id)?.name.clone();
        if old_name == new_name {
            return self.touch(id);
        }

        let siblings = self
            .node(parent)?
            .children()
            .ok_or_else(|| VfsError::NotADirectory(self.describe(parent)))?;
        if siblings.contains_key(new_name) {
            return Err(VfsError::DuplicateName(new_name.to_string()));
        }

        let now = self.tick();
        if let Some(children) = self.node_mut(parent)?.children_mut() {
            children.remove(&old_name);
            children.insert(new_name.to_string(), id);
        }
        let parent_node = self.node_mut(parent)?;
        parent_node.modified = now;

        let node = self.node_mut(id)?;
        node.name = new_name.to_string();
        node.modified = now;
        Ok(())
    }

    /// Bump the modification time
    pub fn touch(&mut self, id: NodeId) -> VfsResult<()> {
        self.node(id)?;
        let now = self.tick();
        self.node_mut(id)?.modified = now;
        Ok(())
    }

    /// Symlink target, stored verbatim
    pub fn symlink_target(&self, id: NodeId) -> VfsResult<&str> {
        match &self.node(id)?.kind {
            NodeKind::Symlink { target } => Ok(target),
            _ => Err(VfsError::WrongEntityType(format!(
                "{} is not a symlink",
                self.describe(id)
            ))),
        }
    }

    /// Point a symlink somewhere else and bump its modification time
    pub fn set_symlink_target(&mut self, id: NodeId, target: &str) -> VfsResult<()> {
        if target.is_empty() {
            return Err(VfsError::InvalidArgument(
                "symlink target cannot be empty".into(),
            ));
        }
        self.symlink_target(id)?;

        let now = self.tick();
        let node = self.node_mut(id)?;
        if let NodeKind::Symlink { target: current } = &mut node.kind {
            *current = target.to_string();
        }
        node.modified = now;
        Ok(())
    }

    /// Snapshot of a node's metadata
    pub fn metadata(&self, id: NodeId) -> VfsResult<Metadata> {
        let node = self.node(id)?;
        let (child_count, target) = match &node.kind {
            NodeKind::Directory { children } => (Some(children.len()), None),
            NodeKind::Symlink { target } => (None, Some(target.clone())),
            NodeKind::File { .. } => (None, None),
        };

        Ok(Metadata {
            entity_type: node.entity_type(),
            path: self.full_path(id)?,
            size: self.size(id)?,
            created: node.created,
            modified: node.modified,
            child_count,
            target,
        })
    }

    /// One-line description of a node
    ///
    /// Short form is `name/` for directories, `name` for files, and
    /// `name -> target` for symlinks. Detailed form prefixes kind, size, and
    /// modification time.
    pub fn display_info(&self, id: NodeId, detailed: bool) -> VfsResult<String> {
        let node = self.node(id)?;
        let label = match &node.kind {
            NodeKind::Directory { .. } if node.parent.is_none() => String::from("/"),
            NodeKind::Directory { .. } => format!("{}/", node.name),
            NodeKind::File { .. } => node.name.clone(),
            NodeKind::Symlink { target } => format!("{} -> {}", node.name, target),
        };

        if !detailed {
            return Ok(label);
        }

        Ok(format!(
            "{:<4} {:>10} {} {}",
            node.entity_type().tag(),
            self.size(id)?,
            format_timestamp(node.modified),
            label
        ))
    }
}
