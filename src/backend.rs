use crate::backends::memory::Node;
use crate::error::FsResult;
use crate::types::{
    Attr, CreateRequest, Created, DirEntry, MkdirRequest, ReadRequest, RemoveRequest,
    RenameRequest, SymlinkRequest, WriteRequest,
};

/// Per-call handlers a transport adapter drives.
///
/// Every method takes the node the call targets. Kind checks happen before
/// any storage access. None of the methods suspend; they are async so an
/// adapter can call them from its own runtime.
#[async_trait::async_trait]
pub trait NodeOps: Send + Sync + 'static {
    fn root(&self) -> Node;

    async fn getattr(&self, node: &Node) -> FsResult<Attr>;

    /// `node` must be a directory.
    async fn lookup(&self, node: &Node, name: &str) -> FsResult<Node>;

    async fn readdir(&self, node: &Node) -> FsResult<Vec<DirEntry>>;

    async fn mkdir(&self, node: &Node, req: &MkdirRequest) -> FsResult<Node>;

    async fn create(&self, node: &Node, req: &CreateRequest) -> FsResult<Created>;

    async fn symlink(&self, node: &Node, req: &SymlinkRequest) -> FsResult<Node>;

    /// Unlink or rmdir, depending on `req.dir`.
    async fn remove(&self, node: &Node, req: &RemoveRequest) -> FsResult<()>;

    /// Returns the number of bytes accepted.
    async fn write(&self, node: &Node, req: &WriteRequest) -> FsResult<usize>;

    async fn read(&self, node: &Node, req: &ReadRequest) -> FsResult<Vec<u8>>;

    async fn fsync(&self, node: &Node) -> FsResult<()>;

    async fn readlink(&self, node: &Node) -> FsResult<String>;

    async fn rename(&self, node: &Node, req: &RenameRequest, new_dir: &Node) -> FsResult<()>;
}
