/*!
 * File Content Operations
 * In-memory content buffer plus the bridge to host storage
 */

use std::fs;
use std::path::Path;

use tracing::warn;

use super::super::types::*;
use super::node::NodeKind;
use super::{NodeId, Tree};

impl Tree {
    /// Borrow a file's content
    pub fn content(&self, id: NodeId) -> VfsResult<&[u8]> {
        match &self.node(id)?.kind {
            NodeKind::File { content } => Ok(content),
            _ => Err(self.not_a_file(id)),
        }
    }

    /// Replace a file's content
    ///
    /// Size and modification time change together with the buffer; on
    /// `OutOfSpace` nothing changes.
    pub fn set_content(&mut self, id: NodeId, data: &[u8]) -> VfsResult<()> {
        let old_len = self.content(id)?.len();
        self.resize_accounting(old_len, data.len())?;

        let now = self.tick();
        let node = self.node_mut(id)?;
        if let NodeKind::File { content } = &mut node.kind {
            content.clear();
            content.extend_from_slice(data);
        }
        node.modified = now;
        Ok(())
    }

    /// Append to a file's content
    pub fn append_content(&mut self, id: NodeId, data: &[u8]) -> VfsResult<()> {
        self.content(id)?;
        self.reserve(data.len())?;

        let now = self.tick();
        let node = self.node_mut(id)?;
        if let NodeKind::File { content } = &mut node.kind {
            content.extend_from_slice(data);
        }
        node.modified = now;
        Ok(())
    }

    /// Write a file's content to host storage
    pub fn write_to_external_sink(&self, id: NodeId, host_path: &Path) -> VfsResult<()> {
        let content = self.content(id)?;
        fs::write(host_path, content).map_err(|e| {
            warn!(path = %host_path.display(), error = %e, "External write failed");
            VfsError::io(e, host_path.display())
        })
    }

    /// Replace a file's content with bytes read from host storage
    ///
    /// The source is read completely before the buffer is touched, so a
    /// failed read leaves the in-memory content unchanged.
    pub fn read_from_external_source(&mut self, id: NodeId, host_path: &Path) -> VfsResult<()> {
        self.content(id)?;
        let data = read_external(host_path)?;
        self.set_content(id, &data)
    }

    fn not_a_file(&self, id: NodeId) -> VfsError {
        let kind = self
            .entity_type(id)
            .map(|t| t.to_string())
            .unwrap_or_else(|_| String::from("entry"));
        VfsError::WrongEntityType(format!("{} is a {}, not a file", self.describe(id), kind))
    }
}

/// Read a whole host file, logging and wrapping any failure
pub(crate) fn read_external(host_path: &Path) -> VfsResult<Vec<u8>> {
    fs::read(host_path).map_err(|e| {
        warn!(path = %host_path.display(), error = %e, "External read failed");
        VfsError::io(e, host_path.display())
    })
}
