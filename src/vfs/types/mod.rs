/*!
 * VFS Types
 * Shared types for filesystem operations with serde support
 */

mod entity_type;
mod entry;
mod errors;
mod info;
mod metadata;

pub use entity_type::EntityType;
pub use entry::{validate_name, validate_name_syntax, Entry};
pub use errors::{VfsError, VfsResult};
pub use info::FsInfo;
pub use metadata::Metadata;

pub(crate) use metadata::format_timestamp;
