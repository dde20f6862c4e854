/*!
 * VFS Metadata
 * Entity metadata including timestamps, sizes, and variant details
 */

use super::entity_type::EntityType;
use crate::core::serde::{is_zero_u64, system_time_micros};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use time::macros::format_description;
use time::OffsetDateTime;

/// Entity metadata with compact serialization
///
/// Timestamps are serialized as microseconds since UNIX epoch. Directory sizes
/// are computed at the moment the metadata is produced and are not kept in sync
/// with later mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Metadata {
    pub entity_type: EntityType,
    pub path: String,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    #[serde(with = "system_time_micros")]
    pub created: SystemTime,
    #[serde(with = "system_time_micros")]
    pub modified: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub child_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
}

impl Metadata {
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

    #[inline]
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self.entity_type, EntityType::Symlink)
    }

    /// Modification time rendered as `YYYY-MM-DD HH:MM:SS` (UTC)
    pub fn modified_display(&self) -> String {
        format_timestamp(self.modified)
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
pub(crate) fn format_timestamp(at: SystemTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from(at)
        .format(&format)
        .unwrap_or_else(|_| String::from("-"))
}
