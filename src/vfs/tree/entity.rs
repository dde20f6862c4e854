/*!
 * Detached Entities
 * Owned nodes and subtrees outside of any tree, plus serializable snapshots
 *
 * Subtrees may be arbitrarily deep, so every whole-subtree operation here
 * (drop, clone, comparison, size, validation) works from an explicit stack.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::mem;
use std::time::SystemTime;

use super::super::types::*;
use crate::core::serde::{is_zero_u64, system_time_micros};

/// Creation and modification times carried by a detached entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Stamps {
    pub created: SystemTime,
    pub modified: SystemTime,
}

/// An owned filesystem entity that is not attached to a tree
///
/// Entities are built with [`Entity::file`], [`Entity::directory`], and
/// [`Entity::symlink`], handed to [`Tree::add_child`](super::Tree::add_child),
/// and handed back by [`Tree::remove_child`](super::Tree::remove_child). A
/// directory entity owns its whole subtree. Fresh entities receive their
/// timestamps from the tree when attached; removed ones keep theirs.
///
/// Constructors check name syntax only; the length limit is applied by the
/// tree the entity is attached to.
pub struct Entity {
    name: String,
    stamps: Option<Stamps>,
    kind: EntityKind,
}

/// Variant payload of a detached entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    File { content: Vec<u8> },
    Directory { children: BTreeMap<String, Entity> },
    Symlink { target: String },
}

impl EntityKind {
    fn empty_like(&self) -> Self {
        match self {
            EntityKind::File { .. } => EntityKind::File {
                content: Vec::new(),
            },
            EntityKind::Directory { .. } => EntityKind::Directory {
                children: BTreeMap::new(),
            },
            EntityKind::Symlink { target } => EntityKind::Symlink {
                target: target.clone(),
            },
        }
    }
}

impl Entity {
    /// Create a file entity
    pub fn file(name: impl Into<String>, content: impl Into<Vec<u8>>) -> VfsResult<Self> {
        Self::new(
            name.into(),
            EntityKind::File {
                content: content.into(),
            },
        )
    }

    /// Create an empty directory entity
    pub fn directory(name: impl Into<String>) -> VfsResult<Self> {
        Self::new(
            name.into(),
            EntityKind::Directory {
                children: BTreeMap::new(),
            },
        )
    }

    /// Create a symlink entity; the target is stored verbatim and never followed
    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> VfsResult<Self> {
        let target = target.into();
        if target.is_empty() {
            return Err(VfsError::InvalidArgument(
                "symlink target cannot be empty".into(),
            ));
        }
        Self::new(name.into(), EntityKind::Symlink { target })
    }

    fn new(name: String, kind: EntityKind) -> VfsResult<Self> {
        validate_name_syntax(&name)?;
        Ok(Self {
            name,
            stamps: None,
            kind,
        })
    }

    /// Add a child to a directory entity (builder style)
    pub fn with_child(mut self, child: Entity) -> VfsResult<Self> {
        match &mut self.kind {
            EntityKind::Directory { children } => {
                if children.contains_key(&child.name) {
                    return Err(VfsError::DuplicateName(format!(
                        "{}/{}",
                        self.name, child.name
                    )));
                }
                children.insert(child.name.clone(), child);
                Ok(self)
            }
            _ => Err(VfsError::NotADirectory(self.name.clone())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::File { .. } => EntityType::File,
            EntityKind::Directory { .. } => EntityType::Directory,
            EntityKind::Symlink { .. } => EntityType::Symlink,
        }
    }

    /// Creation time, once the entity has been attached to a tree
    pub fn created(&self) -> Option<SystemTime> {
        self.stamps.map(|s| s.created)
    }

    /// Modification time, once the entity has been attached to a tree
    pub fn modified(&self) -> Option<SystemTime> {
        self.stamps.map(|s| s.modified)
    }

    /// File content
    pub fn content(&self) -> VfsResult<&[u8]> {
        match &self.kind {
            EntityKind::File { content } => Ok(content),
            _ => Err(VfsError::WrongEntityType(format!(
                "{} is a {}, not a file",
                self.name,
                self.entity_type()
            ))),
        }
    }

    /// Pre-order iterator over this entity and everything beneath it
    pub fn subtree(&self) -> Subtree<'_> {
        Subtree { stack: vec![self] }
    }

    /// Size in bytes; directories report the recursive sum of their children
    pub fn size(&self) -> u64 {
        self.subtree()
            .map(|entity| match &entity.kind {
                EntityKind::File { content } => content.len() as u64,
                EntityKind::Symlink { target } => target.len() as u64,
                EntityKind::Directory { .. } => 0,
            })
            .sum()
    }

    /// Number of entities in this subtree, itself included
    pub fn node_count(&self) -> usize {
        self.subtree().count()
    }

    /// File-content bytes in this subtree (what counts against tree capacity)
    pub(super) fn content_bytes(&self) -> usize {
        self.subtree()
            .map(|entity| match &entity.kind {
                EntityKind::File { content } => content.len(),
                _ => 0,
            })
            .sum()
    }

    /// Check every name in the subtree against a length limit
    pub(super) fn validate_names(&self, max_len: usize) -> VfsResult<()> {
        self.subtree()
            .try_for_each(|entity| validate_name(&entity.name, max_len))
    }

    pub(super) fn into_parts(mut self) -> (String, Option<Stamps>, EntityKind) {
        let name = mem::take(&mut self.name);
        let kind = mem::replace(
            &mut self.kind,
            EntityKind::File {
                content: Vec::new(),
            },
        );
        (name, self.stamps, kind)
    }

    pub(super) fn from_parts(name: String, stamps: Stamps, kind: EntityKind) -> Self {
        Self {
            name,
            stamps: Some(stamps),
            kind,
        }
    }

    /// Insert a child into a directory entity, replacing any same-named entry
    pub(super) fn adopt(&mut self, child: Entity) {
        if let EntityKind::Directory { children } = &mut self.kind {
            children.insert(child.name.clone(), child);
        }
    }

    /// Copy of this entity alone, with directories left empty
    fn shallow_clone(&self) -> Self {
        let kind = match &self.kind {
            EntityKind::File { content } => EntityKind::File {
                content: content.clone(),
            },
            other => other.empty_like(),
        };
        Self {
            name: self.name.clone(),
            stamps: self.stamps,
            kind,
        }
    }
}

/// Fold a pre-order list of `(parent index, entity)` pairs back into one tree
///
/// Descendants always follow their ancestor, so popping from the back
/// completes every subtree before it is handed to its parent.
pub(super) fn assemble(mut pending: Vec<(Option<usize>, Entity)>) -> Option<Entity> {
    while pending.len() > 1 {
        let (parent, entity) = pending.pop()?;
        if let Some((_, owner)) = parent.and_then(|index| pending.get_mut(index)) {
            owner.adopt(entity);
        }
    }
    pending.pop().map(|(_, entity)| entity)
}

/// Pre-order iterator over an entity subtree
#[derive(Debug, Clone)]
pub struct Subtree<'a> {
    stack: Vec<&'a Entity>,
}

impl<'a> Iterator for Subtree<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<&'a Entity> {
        let entity = self.stack.pop()?;
        if let EntityKind::Directory { children } = &entity.kind {
            self.stack.extend(children.values().rev());
        }
        Some(entity)
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let EntityKind::Directory { children } = &mut self.kind {
            pending.extend(mem::take(children).into_values());
        }
        while let Some(mut entity) = pending.pop() {
            if let EntityKind::Directory { children } = &mut entity.kind {
                pending.extend(mem::take(children).into_values());
            }
        }
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        let mut copies: Vec<(Option<usize>, Entity)> = Vec::new();
        let mut stack: Vec<(Option<usize>, &Entity)> = vec![(None, self)];
        while let Some((parent, entity)) = stack.pop() {
            let index = copies.len();
            copies.push((parent, entity.shallow_clone()));
            if let EntityKind::Directory { children } = &entity.kind {
                stack.extend(children.values().map(|child| (Some(index), child)));
            }
        }
        assemble(copies).unwrap_or_else(|| self.shallow_clone())
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.name != b.name || a.stamps != b.stamps {
                return false;
            }
            match (&a.kind, &b.kind) {
                (EntityKind::File { content: x }, EntityKind::File { content: y }) if x == y => {}
                (EntityKind::Symlink { target: x }, EntityKind::Symlink { target: y })
                    if x == y => {}
                (
                    EntityKind::Directory { children: x },
                    EntityKind::Directory { children: y },
                ) if x.len() == y.len() => {
                    for ((xn, xc), (yn, yc)) in x.iter().zip(y.iter()) {
                        if xn != yn {
                            return false;
                        }
                        stack.push((xc, yc));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Entity {}

/// Shallow debug view: directory children are listed by name only
impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Entity");
        out.field("name", &self.name)
            .field("type", &self.entity_type())
            .field("created", &self.created())
            .field("modified", &self.modified());
        match &self.kind {
            EntityKind::File { content } => out.field("len", &content.len()),
            EntityKind::Symlink { target } => out.field("target", target),
            EntityKind::Directory { children } => {
                out.field("children", &children.keys().collect::<Vec<_>>())
            }
        };
        out.finish()
    }
}

/// Serializable view of an attached entity and its descendants
///
/// This is the per-entity serialization hook. File content is not included,
/// only its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct EntitySnapshot {
    pub name: String,
    pub entity_type: EntityType,
    pub path: String,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    #[serde(with = "system_time_micros")]
    pub created: SystemTime,
    #[serde(with = "system_time_micros")]
    pub modified: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<EntitySnapshot>,
}

impl EntitySnapshot {
    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> VfsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VfsError::InvalidArgument(format!("snapshot serialization failed: {}", e)))
    }
}
