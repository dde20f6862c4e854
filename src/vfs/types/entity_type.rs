/*!
 * VFS Entity Type Enum
 * Defines the kind of a filesystem node
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kind with complete serde support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    File,
    Directory,
    Symlink,
}

impl EntityType {
    /// Short tag used in detailed listings
    pub const fn tag(&self) -> &'static str {
        match self {
            EntityType::File => "FILE",
            EntityType::Directory => "DIR",
            EntityType::Symlink => "LINK",
        }
    }
}

impl Default for EntityType {
    fn default() -> Self {
        Self::File
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityType::File => write!(f, "file"),
            EntityType::Directory => write!(f, "directory"),
            EntityType::Symlink => write!(f, "symlink"),
        }
    }
}
