/*!
 * simfs
 * In-memory hierarchical filesystem simulator exposed as a library
 */

pub mod core;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use crate::core::config::FsConfig;
pub use monitoring::{init_tracing, OperationSpan};
pub use vfs::{
    init_session, Entity, EntityType, Entry, FsInfo, Metadata, NodeId, Session, SharedSession, SharedTree,
    Tree, VfsError, VfsResult,
};
