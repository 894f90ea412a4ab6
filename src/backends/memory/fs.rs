//! Operation handlers over the node store.

use std::sync::Arc;

use tracing::debug;

use crate::backend::NodeOps;
use crate::config::{FsConfig, IoMode};
use crate::error::{FsError, FsResult};
use crate::types::{
    Attr, CreateRequest, Created, DirEntry, FileHandle, MkdirRequest, NodeKind, ReadRequest,
    RemoveRequest, RenameRequest, SymlinkRequest, WriteRequest,
};

use super::node::{self, Node};
use super::store::NodeStore;

/// In-memory filesystem backed by a transactional node table.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Debug, Clone)]
pub struct MemFs {
    store: Arc<NodeStore>,
    config: FsConfig,
}

impl MemFs {
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    pub fn with_config(config: FsConfig) -> Self {
        Self {
            store: Arc::new(NodeStore::new()),
            config,
        }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Validate a request offset. Negative offsets lie before the start of the file.
    fn offset(offset: i64) -> FsResult<usize> {
        usize::try_from(offset).map_err(|_| FsError::InvalidArgument)
    }

    fn check_name(name: &str) -> FsResult<()> {
        if node::is_valid_name(name) {
            Ok(())
        } else {
            Err(FsError::InvalidArgument)
        }
    }

    /// Length the content will have after the write, bounded by `max_file_size`.
    fn written_len(&self, offset: usize, len: usize) -> FsResult<usize> {
        let end = match self.config.io_mode {
            IoMode::WholeContent => len,
            IoMode::Positional => offset.checked_add(len).ok_or(FsError::FileTooLarge)?,
        };
        if end as u64 > self.config.max_file_size {
            return Err(FsError::FileTooLarge);
        }
        Ok(end)
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

/// Overwrite `data` at `offset`, zero-filling any gap. `end` is `offset + bytes.len()`.
fn splice(data: &mut Vec<u8>, offset: usize, end: usize, bytes: &[u8]) {
    if end > data.len() {
        data.resize(end, 0);
    }
    data[offset..end].copy_from_slice(bytes);
}

#[async_trait::async_trait]
impl NodeOps for MemFs {
    fn root(&self) -> Node {
        self.store.root()
    }

    async fn getattr(&self, node: &Node) -> FsResult<Attr> {
        debug!(path = %node.path, "getattr");
        // file content lives in the table; the caller's copy may be stale
        if node.is_regular() {
            if let Some(current) = self.store.get(&node.path) {
                return Ok(current.attr());
            }
        }
        Ok(node.attr())
    }

    async fn lookup(&self, node: &Node, name: &str) -> FsResult<Node> {
        debug!(path = %node.path, name, "lookup");
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        if !node::is_valid_name(name) {
            return Err(FsError::NotFound);
        }
        self.store.lookup_child(node, name)
    }

    async fn readdir(&self, node: &Node) -> FsResult<Vec<DirEntry>> {
        debug!(path = %node.path, "readdir");
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        Ok(self.store.list_children(node))
    }

    async fn mkdir(&self, node: &Node, req: &MkdirRequest) -> FsResult<Node> {
        debug!(path = %node.path, name = %req.name, mode = req.mode.0, "mkdir");
        if !node.is_dir() || !req.mode.is_dir() {
            return Err(FsError::NotADirectory);
        }
        Self::check_name(&req.name)?;
        self.store
            .create(Node::new_dir(&node.path, &req.name, req.mode.perm()))
    }

    async fn create(&self, node: &Node, req: &CreateRequest) -> FsResult<Created> {
        debug!(path = %node.path, name = %req.name, mode = req.mode.0, "create");
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        match req.mode.kind() {
            Some(NodeKind::RegularFile) => {}
            Some(NodeKind::Directory) => return Err(FsError::IsADirectory),
            _ => return Err(FsError::InvalidArgument),
        }
        Self::check_name(&req.name)?;

        let created = self
            .store
            .create(Node::new_file(&node.path, &req.name, req.mode.perm()))?;
        let handle = FileHandle {
            fh: created.id,
            path: created.path.clone(),
        };
        Ok(Created {
            node: created,
            handle,
        })
    }

    async fn symlink(&self, node: &Node, req: &SymlinkRequest) -> FsResult<Node> {
        debug!(path = %node.path, name = %req.name, target = %req.target, "symlink");
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        Self::check_name(&req.name)?;
        if req.target.len() > self.config.max_symlink_target {
            return Err(FsError::InvalidArgument);
        }
        self.store
            .create(Node::new_symlink(&node.path, &req.name, &req.target))
    }

    async fn remove(&self, node: &Node, req: &RemoveRequest) -> FsResult<()> {
        debug!(path = %node.path, name = %req.name, dir = req.dir, "remove");
        if !node.is_dir() {
            return Err(FsError::NotADirectory);
        }
        // a name that cannot exist removes nothing, like any missing name
        if !node::is_valid_name(&req.name) {
            return Ok(());
        }
        self.store
            .remove(&node.path, &req.name, self.config.remove_policy)
    }

    async fn write(&self, node: &Node, req: &WriteRequest) -> FsResult<usize> {
        debug!(path = %node.path, offset = req.offset, len = req.data.len(), "write");
        if !node.is_regular() {
            return Err(FsError::InvalidArgument);
        }
        let offset = Self::offset(req.offset)?;
        if req.data.is_empty() {
            return Ok(0);
        }
        let end = self.written_len(offset, req.data.len())?;

        self.store.update(&node.path, |current| {
            // the path may now hold a different kind of node
            if !current.is_regular() {
                return Err(FsError::InvalidArgument);
            }
            match self.config.io_mode {
                IoMode::WholeContent => current.data = req.data.clone(),
                IoMode::Positional => splice(&mut current.data, offset, end, &req.data),
            }
            Ok(())
        })?;
        Ok(req.data.len())
    }

    async fn read(&self, node: &Node, req: &ReadRequest) -> FsResult<Vec<u8>> {
        debug!(path = %node.path, offset = req.offset, size = req.size, "read");
        if !node.is_regular() {
            return Err(FsError::InvalidArgument);
        }
        let offset = Self::offset(req.offset)?;
        if req.size == 0 {
            return Ok(Vec::new());
        }

        let current = self.store.get(&node.path).ok_or(FsError::NotFound)?;
        if !current.is_regular() {
            return Err(FsError::InvalidArgument);
        }
        match self.config.io_mode {
            IoMode::WholeContent => Ok(current.data),
            IoMode::Positional => {
                if offset >= current.data.len() {
                    return Ok(Vec::new());
                }
                let end = current.data.len().min(offset + req.size as usize);
                Ok(current.data[offset..end].to_vec())
            }
        }
    }

    async fn fsync(&self, node: &Node) -> FsResult<()> {
        debug!(path = %node.path, "fsync");
        Ok(())
    }

    async fn readlink(&self, node: &Node) -> FsResult<String> {
        debug!(path = %node.path, "readlink");
        if !node.is_symlink() {
            return Err(FsError::InvalidArgument);
        }
        Ok(node.symlink_target.clone())
    }

    async fn rename(&self, node: &Node, req: &RenameRequest, new_dir: &Node) -> FsResult<()> {
        debug!(
            path = %node.path,
            old_name = %req.old_name,
            new_name = %req.new_name,
            new_dir = %new_dir.path,
            "rename"
        );
        Err(FsError::Unimplemented)
    }
}
