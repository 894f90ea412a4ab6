//! Request and reply types shared by the handlers and their callers.

use serde::{Deserialize, Serialize};

use crate::backends::memory::Node;

/// The kinds of entry the namespace can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Directory,
    RegularFile,
    Symlink,
}

/// Raw POSIX-style mode: file-type bits plus permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mode(pub u32);

impl Mode {
    pub const S_IFMT: u32 = 0o170000;
    pub const S_IFSOCK: u32 = 0o140000;
    pub const S_IFLNK: u32 = 0o120000;
    pub const S_IFREG: u32 = 0o100000;
    pub const S_IFBLK: u32 = 0o060000;
    pub const S_IFDIR: u32 = 0o040000;
    pub const S_IFCHR: u32 = 0o020000;
    pub const S_IFIFO: u32 = 0o010000;
    pub const PERM_MASK: u32 = 0o7777;

    pub fn dir(perm: u32) -> Self {
        Mode(Self::S_IFDIR | (perm & Self::PERM_MASK))
    }

    pub fn file(perm: u32) -> Self {
        Mode(Self::S_IFREG | (perm & Self::PERM_MASK))
    }

    pub fn symlink(perm: u32) -> Self {
        Mode(Self::S_IFLNK | (perm & Self::PERM_MASK))
    }

    /// `None` for file types the namespace cannot hold (FIFOs, sockets, devices).
    pub fn kind(&self) -> Option<NodeKind> {
        match self.0 & Self::S_IFMT {
            Self::S_IFDIR => Some(NodeKind::Directory),
            Self::S_IFREG => Some(NodeKind::RegularFile),
            Self::S_IFLNK => Some(NodeKind::Symlink),
            _ => None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == Some(NodeKind::Directory)
    }

    pub fn is_regular(&self) -> bool {
        self.kind() == Some(NodeKind::RegularFile)
    }

    pub fn perm(&self) -> u32 {
        self.0 & Self::PERM_MASK
    }
}

/// Attributes reported for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attr {
    pub ino: u64,
    pub kind: NodeKind,
    pub perm: u32,
    pub size: u64,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub ino: u64,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MkdirRequest {
    pub name: String,
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymlinkRequest {
    pub name: String,
    pub target: String,
}

/// Unlink when `dir` is false, rmdir when true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub name: String,
    pub dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    pub offset: i64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadRequest {
    pub offset: i64,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub old_name: String,
    pub new_name: String,
}

/// Open file handle. Handles are the node itself, so `fh` is the node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub fh: u64,
    pub path: String,
}

/// Reply to a file creation: the new node and its open handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
    pub node: Node,
    pub handle: FileHandle,
}
