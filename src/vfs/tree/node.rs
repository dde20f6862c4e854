/*!
 * Tree Node Types
 * Internal arena representation of files, directories, and symlinks
 */

use std::collections::BTreeMap;
use std::time::SystemTime;

use super::super::types::EntityType;
use super::NodeId;

/// Attached filesystem node
#[derive(Debug, Clone)]
pub(super) struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub created: SystemTime,
    pub modified: SystemTime,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(super) enum NodeKind {
    File { content: Vec<u8> },
    Directory { children: BTreeMap<String, NodeId> },
    Symlink { target: String },
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            NodeKind::File { .. } => EntityType::File,
            NodeKind::Directory { .. } => EntityType::Directory,
            NodeKind::Symlink { .. } => EntityType::Symlink,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            _ => None,
        }
    }

    /// Size carried by the node itself; directories carry none
    pub fn own_size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { content } => content.len() as u64,
            NodeKind::Symlink { target } => target.len() as u64,
            NodeKind::Directory { .. } => 0,
        }
    }
}
