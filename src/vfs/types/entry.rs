/*!
 * VFS Directory Entry
 * Child summaries produced by directory listings, plus name validation
 */

use super::entity_type::EntityType;
use super::errors::{VfsError, VfsResult};
use super::metadata::Metadata;
use crate::core::limits::{MAX_NAME_LEN, PATH_SEPARATOR};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Directory entry: name and kind, with full metadata for detailed listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    #[serde(deserialize_with = "deserialize_valid_name")]
    pub name: String,
    pub entity_type: EntityType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
}

impl Entry {
    /// Create a summary entry with validation
    #[must_use = "validation result must be checked"]
    pub fn new(name: String, entity_type: EntityType) -> VfsResult<Self> {
        Self::validate_name(&name)?;
        Ok(Self {
            name,
            entity_type,
            metadata: None,
        })
    }

    /// Create an entry without validation (names inside the tree are already valid)
    pub(crate) fn new_unchecked(
        name: String,
        entity_type: EntityType,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            name,
            entity_type,
            metadata,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.entity_type, EntityType::Directory)
    }

    #[inline]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.entity_type, EntityType::File)
    }

    /// Validate an entity name against the default length limit
    #[must_use = "validation result must be checked"]
    pub fn validate_name(name: &str) -> VfsResult<()> {
        validate_name(name, MAX_NAME_LEN)
    }
}

impl fmt::Display for Entry {
    /// Summary form: `name` for files, `name/` for directories, and
    /// `kind size modified name` when metadata is attached
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.is_dir() { "/" } else { "" };
        match &self.metadata {
            Some(meta) => {
                write!(
                    f,
                    "{:<4} {:>10} {} {}{}",
                    self.entity_type.tag(),
                    meta.size,
                    meta.modified_display(),
                    self.name,
                    suffix
                )?;
                if let Some(target) = &meta.target {
                    write!(f, " -> {}", target)?;
                }
                Ok(())
            }
            None => write!(f, "{}{}", self.name, suffix),
        }
    }
}

/// Validate an entity name
///
/// Names must be non-empty, at most `max_len` bytes, must not be `.` or `..`,
/// and must not contain the path separator or null bytes.
pub fn validate_name(name: &str, max_len: usize) -> VfsResult<()> {
    validate_name_syntax(name)?;
    if name.len() > max_len {
        return Err(VfsError::InvalidName(format!(
            "name exceeds {} bytes: {}",
            max_len, name
        )));
    }
    Ok(())
}

/// Validate everything about a name except its length
///
/// The length limit belongs to the tree a name is attached to.
pub fn validate_name_syntax(name: &str) -> VfsResult<()> {
    if name.is_empty() {
        return Err(VfsError::InvalidName("name cannot be empty".into()));
    }
    if name == "." || name == ".." {
        return Err(VfsError::InvalidName(format!("reserved name: {}", name)));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(VfsError::InvalidName(format!(
            "name cannot contain path separators: {}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(VfsError::InvalidName(
            "name cannot contain null bytes".into(),
        ));
    }
    Ok(())
}

/// Deserialize and validate an entry name
///
/// Only syntax is checked; trees may be configured with a longer name limit.
fn deserialize_valid_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    validate_name_syntax(&name).map_err(serde::de::Error::custom)?;
    Ok(name)
}
