/*!
 * Virtual File System Module
 * In-memory directory tree with cursor-based sessions
 */

mod init;
pub mod paths;
pub mod session;
pub mod shared;
pub mod tree;
pub mod types;

// Re-exports
pub use init::{create_standard_directories, init_session};
pub use session::{Session, TreeAccess};
pub use shared::{SharedSession, SharedTree};
pub use tree::{
    Entity, EntityKind, EntitySnapshot, Listing, NodeId, Subtree, Tree, TreeCounts, Walk,
};
pub use types::{
    validate_name, validate_name_syntax, EntityType, Entry, FsInfo, Metadata, VfsError, VfsResult,
};
