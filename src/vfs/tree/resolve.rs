/*!
 * Path Resolution
 * Walks `/`-separated path strings from a starting directory
 */

use super::super::types::*;
use crate::core::limits::{MAX_PATH_LEN, PATH_SEPARATOR};
use super::{NodeId, Tree};

impl Tree {
    /// Resolve a path to a directory
    ///
    /// Empty and `.` paths return `start`. A leading `/` starts at the root.
    /// `.` segments are skipped, `..` moves to the parent (and stays put at the
    /// root), and any other segment must name a child directory; a missing
    /// segment or a non-directory fails with `PathNotFound` at once. Symlinks
    /// are never followed.
    pub fn resolve(&self, start: NodeId, path: &str) -> VfsResult<NodeId> {
        check_length(path)?;

        // Absolute paths never look at `start`, so a stale cursor can recover
        let mut current = if path.starts_with(PATH_SEPARATOR) {
            self.root
        } else {
            start
        };
        if !self.node(current)?.is_dir() {
            return Err(VfsError::NotADirectory(self.describe(current)));
        }

        if path.is_empty() || path == "." {
            return Ok(current);
        }

        for segment in path.split(PATH_SEPARATOR) {
            current = self.step(current, segment, path)?;
        }
        Ok(current)
    }

    /// Resolve a path to an entry of any type
    ///
    /// Every segment but the last must be a directory; the last may name a
    /// file, directory, or symlink.
    pub fn resolve_entry(&self, start: NodeId, path: &str) -> VfsResult<NodeId> {
        check_length(path)?;

        let trimmed = path.trim_end_matches(PATH_SEPARATOR);
        let (dir_part, last) = match trimmed.rsplit_once(PATH_SEPARATOR) {
            Some(("", last)) => ("/", last),
            Some((dir, last)) => (dir, last),
            None if path.starts_with(PATH_SEPARATOR) => ("/", ""),
            None => ("", trimmed),
        };

        let dir = self.resolve(start, dir_part)?;
        match last {
            "" | "." => Ok(dir),
            ".." => Ok(self.node(dir)?.parent.unwrap_or(dir)),
            name => self
                .children_of(dir)?
                .get(name)
                .copied()
                .ok_or_else(|| VfsError::PathNotFound(path.to_string())),
        }
    }

    fn step(&self, current: NodeId, segment: &str, path: &str) -> VfsResult<NodeId> {
        match segment {
            "" | "." => Ok(current),
            ".." => Ok(self.node(current)?.parent.unwrap_or(current)),
            name => {
                let child = self
                    .children_of(current)?
                    .get(name)
                    .copied()
                    .ok_or_else(|| VfsError::PathNotFound(path.to_string()))?;
                if self.node(child)?.is_dir() {
                    Ok(child)
                } else {
                    Err(VfsError::PathNotFound(path.to_string()))
                }
            }
        }
    }
}

fn check_length(path: &str) -> VfsResult<()> {
    if path.len() > MAX_PATH_LEN {
        return Err(VfsError::InvalidName(format!(
            "path exceeds {} bytes",
            MAX_PATH_LEN
        )));
    }
    Ok(())
}
