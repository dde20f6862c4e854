/*!
 * Filesystem Info
 * Summary of the working directory
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Working directory summary
///
/// `size` is the recursive size of the directory and `child_count` counts
/// direct children only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FsInfo {
    pub working_directory: String,
    pub size: u64,
    pub child_count: usize,
}

impl fmt::Display for FsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File System Information:")?;
        writeln!(f, "Current Directory: {}", self.working_directory)?;
        writeln!(f, "Current Directory Size: {} bytes", self.size)?;
        write!(f, "Current Directory Children: {}", self.child_count)
    }
}
