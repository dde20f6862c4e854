/*!
 * Tree Traversal Operations
 * Depth-first walks, name search, counting, rendering, and snapshots
 */

use serde::{Deserialize, Serialize};

use super::super::types::*;
use super::entity::EntitySnapshot;
use super::node::NodeKind;
use super::{NodeId, Tree};
use crate::core::limits::{
    MAX_SNAPSHOT_DEPTH, TREE_BRANCH, TREE_LAST_BRANCH, TREE_PIPE, TREE_SPACE,
};

/// Depth-first, pre-order iterator over the descendants of a directory
///
/// Yields `(depth, id)` with direct children at depth 1. Siblings come in
/// name order, matching [`Tree::list_children`].
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Walk<'a> {
    fn new(tree: &'a Tree, dir: NodeId) -> VfsResult<Self> {
        let mut walk = Self {
            tree,
            stack: Vec::new(),
        };
        walk.push_children(dir, 1)?;
        Ok(walk)
    }

    fn push_children(&mut self, dir: NodeId, depth: usize) -> VfsResult<()> {
        let children = self.tree.children_of(dir)?;
        self.stack
            .extend(children.values().rev().map(|&id| (depth, id)));
        Ok(())
    }
}

impl Iterator for Walk<'_> {
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        if let Ok(node) = self.tree.node(id) {
            if let Some(children) = node.children() {
                self.stack
                    .extend(children.values().rev().map(|&child| (depth + 1, child)));
            }
        }
        Some((depth, id))
    }
}

/// Entity counts for a subtree, excluding its root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCounts {
    pub files: usize,
    pub directories: usize,
    pub symlinks: usize,
}

impl TreeCounts {
    pub fn total(&self) -> usize {
        self.files + self.directories + self.symlinks
    }
}

impl Tree {
    /// Walk all descendants of a directory
    pub fn walk(&self, dir: NodeId) -> VfsResult<Walk<'_>> {
        Walk::new(self, dir)
    }

    /// Find descendants whose name matches exactly
    ///
    /// Only direct children are searched unless `recursive` is set. No match
    /// yields an empty vector.
    pub fn find(&self, dir: NodeId, name: &str, recursive: bool) -> VfsResult<Vec<NodeId>> {
        if !recursive {
            return Ok(self.children_of(dir)?.get(name).copied().into_iter().collect());
        }

        Ok(self
            .walk(dir)?
            .filter(|&(_, id)| self.node(id).map(|n| n.name == name).unwrap_or(false))
            .map(|(_, id)| id)
            .collect())
    }

    /// Count files, directories, and symlinks beneath a directory
    pub fn count(&self, dir: NodeId) -> VfsResult<TreeCounts> {
        let mut counts = TreeCounts::default();
        for (_, id) in self.walk(dir)? {
            match self.node(id)?.entity_type() {
                EntityType::File => counts.files += 1,
                EntityType::Directory => counts.directories += 1,
                EntityType::Symlink => counts.symlinks += 1,
            }
        }
        Ok(counts)
    }

    /// Render a directory as an indented text tree
    ///
    /// Every line starts with `prefix`. Directory lines show their child
    /// count, file lines their size, and symlink lines their target.
    pub fn display_tree(&self, dir: NodeId, prefix: &str) -> VfsResult<String> {
        let mut out = String::new();
        out.push_str(prefix);
        out.push_str(&self.tree_label(dir)?);
        out.push('\n');
        self.render_children(dir, prefix, &mut out)?;
        Ok(out)
    }

    fn render_children(&self, dir: NodeId, prefix: &str, out: &mut String) -> VfsResult<()> {
        let mut stack: Vec<(NodeId, String, bool)> = Vec::new();
        self.push_rendered_children(dir, prefix, &mut stack)?;

        while let Some((id, prefix, last)) = stack.pop() {
            out.push_str(&prefix);
            out.push_str(if last { TREE_LAST_BRANCH } else { TREE_BRANCH });
            out.push_str(&self.tree_label(id)?);
            out.push('\n');

            if self.node(id)?.is_dir() {
                let nested = format!("{}{}", prefix, if last { TREE_SPACE } else { TREE_PIPE });
                self.push_rendered_children(id, &nested, &mut stack)?;
            }
        }
        Ok(())
    }

    /// Queue a directory's children so they pop in name order
    fn push_rendered_children(
        &self,
        dir: NodeId,
        prefix: &str,
        stack: &mut Vec<(NodeId, String, bool)>,
    ) -> VfsResult<()> {
        let children = self.children_of(dir)?;
        let last_index = children.len().saturating_sub(1);
        stack.extend(
            children
                .values()
                .enumerate()
                .rev()
                .map(|(index, &child)| (child, prefix.to_string(), index == last_index)),
        );
        Ok(())
    }

    fn tree_label(&self, id: NodeId) -> VfsResult<String> {
        let node = self.node(id)?;
        Ok(match &node.kind {
            NodeKind::Directory { children } => {
                let name = if node.parent.is_none() { "" } else { node.name.as_str() };
                format!("{}/ ({})", name, plural(children.len(), "item"))
            }
            NodeKind::File { content } => {
                format!("{} ({})", node.name, plural(content.len(), "byte"))
            }
            NodeKind::Symlink { target } => format!("{} -> {}", node.name, target),
        })
    }

    /// Serializable snapshot of a node and its descendants
    ///
    /// Snapshots nest one level per directory, so subtrees deeper than
    /// [`MAX_SNAPSHOT_DEPTH`] are refused with `InvalidArgument`.
    pub fn snapshot(&self, id: NodeId) -> VfsResult<EntitySnapshot> {
        if self.node(id)?.is_dir() {
            if let Some((depth, _)) = self.walk(id)?.find(|&(depth, _)| depth > MAX_SNAPSHOT_DEPTH) {
                return Err(VfsError::InvalidArgument(format!(
                    "{} is more than {} levels deep (reached {})",
                    self.describe(id),
                    MAX_SNAPSHOT_DEPTH,
                    depth
                )));
            }
        }
        self.snapshot_node(id)
    }

    fn snapshot_node(&self, id: NodeId) -> VfsResult<EntitySnapshot> {
        let node = self.node(id)?;
        let (target, children) = match &node.kind {
            NodeKind::Symlink { target } => (Some(target.clone()), Vec::new()),
            NodeKind::File { .. } => (None, Vec::new()),
            NodeKind::Directory { children } => (
                None,
                children
                    .values()
                    .map(|&child| self.snapshot_node(child))
                    .collect::<VfsResult<Vec<_>>>()?,
            ),
        };

        Ok(EntitySnapshot {
            name: node.name.clone(),
            entity_type: node.entity_type(),
            path: self.full_path(id)?,
            size: self.size(id)?,
            created: node.created,
            modified: node.modified,
            target,
            children,
        })
    }
}

fn plural(count: usize, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
