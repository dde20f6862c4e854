/*!
 * VFS Error Types
 * Structured, type-safe error handling for filesystem operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// VFS operation result
///
/// # Must Use
/// VFS operations can fail and must be handled to prevent silent state loss
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// All error variants carrying a context string require it to be non-empty.
/// Serialization uses tagged enum pattern for type safety.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Invalid name: {0}")]
    #[diagnostic(
        code(vfs::invalid_name),
        help("Names must be non-empty, within the length limit, and contain no '/'.")
    )]
    InvalidName(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Duplicate name: {0}")]
    #[diagnostic(
        code(vfs::duplicate_name),
        help("An entry with this name already exists in the directory.")
    )]
    DuplicateName(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not found: {0}")]
    #[diagnostic(code(vfs::not_found))]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Path not found: {0}")]
    #[diagnostic(
        code(vfs::path_not_found),
        help("Every path component must name an existing directory.")
    )]
    PathNotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not a directory: {0}")]
    #[diagnostic(code(vfs::not_a_directory))]
    NotADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Wrong entity type: {0}")]
    #[diagnostic(
        code(vfs::wrong_entity_type),
        help("The operation is only defined for another kind of entry.")
    )]
    WrongEntityType(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Directory not empty: {0}")]
    #[diagnostic(
        code(vfs::directory_not_empty),
        help("Remove the contents first, or use recursive removal.")
    )]
    DirectoryNotEmpty(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(vfs::io_error))]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(vfs::invalid_argument))]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Out of space")]
    #[diagnostic(
        code(vfs::out_of_space),
        help("The tree's content capacity would be exceeded.")
    )]
    OutOfSpace,
}

impl VfsError {
    /// Convert a host I/O failure into a VFS error
    pub(crate) fn io(e: std::io::Error, context: impl std::fmt::Display) -> Self {
        VfsError::IoError(format!("{}: {}", context, e))
    }

    /// True for lookup misses (`NotFound` and `PathNotFound`)
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_) | VfsError::PathNotFound(_))
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
