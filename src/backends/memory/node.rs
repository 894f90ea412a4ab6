//! Node records stored in the table.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::{Attr, DirEntry, NodeKind};

use super::table::Record;

pub const DEFAULT_DIR_PERM: u32 = 0o775;
pub const DEFAULT_FILE_PERM: u32 = 0o644;
pub const DEFAULT_SYMLINK_PERM: u32 = 0o777;

/// Maximum length of a symlink target.
pub const MAX_SYMLINK_TARGET: usize = 4096;

/// Path of the root directory.
pub const ROOT_PATH: &str = "";

/// Derive a node id from its path.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable for the
/// life of the process, which is as long as the table lives.
pub fn derive_id(path: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

/// A name is one path component: non-empty, no `/`, no NUL.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\0'])
}

/// Join a parent path and a child name into the child's key.
pub fn child_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent, name)
}

/// One filesystem entry.
///
/// There is no stored size: it is computed from `data` (or the symlink
/// target), so it can never disagree with the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub id: u64,
    pub kind: NodeKind,
    pub perm: u32,
    pub symlink_target: String,
    pub data: Vec<u8>,
}

impl Node {
    fn new(parent: &str, name: &str, kind: NodeKind, perm: u32) -> Self {
        let path = child_path(parent, name);
        Node {
            id: derive_id(&path),
            path,
            name: name.to_string(),
            kind,
            perm,
            symlink_target: String::new(),
            data: Vec::new(),
        }
    }

    /// The synthesized root directory.
    pub fn root() -> Self {
        Node {
            path: ROOT_PATH.to_string(),
            name: String::new(),
            id: derive_id(ROOT_PATH),
            kind: NodeKind::Directory,
            perm: DEFAULT_DIR_PERM,
            symlink_target: String::new(),
            data: Vec::new(),
        }
    }

    pub fn new_dir(parent: &str, name: &str, perm: u32) -> Self {
        Self::new(parent, name, NodeKind::Directory, perm)
    }

    pub fn new_file(parent: &str, name: &str, perm: u32) -> Self {
        Self::new(parent, name, NodeKind::RegularFile, perm)
    }

    pub fn new_symlink(parent: &str, name: &str, target: &str) -> Self {
        let mut node = Self::new(parent, name, NodeKind::Symlink, DEFAULT_SYMLINK_PERM);
        node.symlink_target = target.to_string();
        node
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_regular(&self) -> bool {
        self.kind == NodeKind::RegularFile
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == NodeKind::Symlink
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Content length for files, target length for symlinks, 0 for directories.
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::RegularFile => self.data.len() as u64,
            NodeKind::Symlink => self.symlink_target.len() as u64,
            NodeKind::Directory => 0,
        }
    }

    pub fn attr(&self) -> Attr {
        Attr {
            ino: self.id,
            kind: self.kind,
            perm: self.perm,
            size: self.size(),
        }
    }

    pub fn dir_entry(&self) -> DirEntry {
        DirEntry {
            name: self.name.clone(),
            ino: self.id,
            kind: self.kind,
        }
    }
}

impl Record for Node {
    fn key(&self) -> &str {
        &self.path
    }

    fn id(&self) -> u64 {
        self.id
    }
}
