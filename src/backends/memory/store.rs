//! Path-keyed node store.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FsError, FsResult, TableError};
use crate::types::DirEntry;

use super::node::{self, Node};
use super::table::Table;

/// What removing a directory does to the records beneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovePolicy {
    /// Delete only the directory's own record; descendants stay in the
    /// table but nothing can reach them.
    Orphan,
    /// Refuse with `DirectoryNotEmpty` while children exist.
    #[default]
    Reject,
    /// Delete the directory and every descendant in one transaction.
    Cascade,
}

/// Owns the node table and the operations the handlers build on.
#[derive(Debug, Default)]
pub struct NodeStore {
    table: Table<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    pub fn root(&self) -> Node {
        Node::root()
    }

    pub fn derive_id(path: &str) -> u64 {
        node::derive_id(path)
    }

    /// Find `name` in `parent`.
    pub fn lookup_child(&self, parent: &Node, name: &str) -> FsResult<Node> {
        let txn = self.table.read();
        match txn.get(&node::child_path(&parent.path, name)) {
            // a child hashing onto its parent is reported as missing
            Some(found) if found.id == parent.id => Err(FsError::NotFound),
            Some(found) => Ok(found.clone()),
            None => Err(FsError::NotFound),
        }
    }

    /// Immediate children of `parent`, grandchildren excluded.
    pub fn list_children(&self, parent: &Node) -> Vec<DirEntry> {
        let txn = self.table.read();
        let prefix = node::child_path(&parent.path, "");
        txn.prefix(&prefix)
            .filter(|child| child.path[prefix.len()..] == child.name)
            .map(Node::dir_entry)
            .collect()
    }

    /// Insert `node`, replacing any record already at its path.
    pub fn create(&self, node: Node) -> FsResult<Node> {
        let mut txn = self.table.write();
        if let Err(err) = txn.insert(node.clone()) {
            let TableError::UniqueViolation { id, key, owner } = &err;
            warn!(id, key = %key, owner = %owner, "node id collision");
            return Err(err.into());
        }
        txn.commit();
        debug!(path = %node.path, id = node.id, kind = ?node.kind, "created node");
        Ok(node)
    }

    /// Persist an already-built record.
    pub fn write(&self, node: Node) -> FsResult<()> {
        self.create(node).map(|_| ())
    }

    /// Remove `parent_path/name`.
    ///
    /// A missing name removes nothing and succeeds. `policy` only matters
    /// when the target is a directory.
    pub fn remove(&self, parent_path: &str, name: &str, policy: RemovePolicy) -> FsResult<()> {
        let path = node::child_path(parent_path, name);
        let descendants = node::child_path(&path, "");
        let mut txn = self.table.write();

        let mut removed = 0;
        if txn.get(&path).is_some_and(Node::is_dir) {
            match policy {
                RemovePolicy::Orphan => {}
                RemovePolicy::Reject => {
                    if txn.prefix(&descendants).next().is_some() {
                        return Err(FsError::DirectoryNotEmpty);
                    }
                }
                RemovePolicy::Cascade => removed += txn.delete_prefix(&descendants),
            }
        }
        if txn.delete(&path).is_some() {
            removed += 1;
        }
        txn.commit();

        debug!(path = %path, removed, ?policy, "removed node");
        Ok(())
    }

    /// Fresh copy of the record at `path`.
    pub fn get(&self, path: &str) -> Option<Node> {
        self.table.read().get(path).cloned()
    }

    /// Read-modify-write of one record inside a single write transaction.
    ///
    /// An error from `f` aborts the transaction and leaves the record as it was.
    pub fn update<T>(
        &self,
        path: &str,
        f: impl FnOnce(&mut Node) -> FsResult<T>,
    ) -> FsResult<T> {
        let mut txn = self.table.write();
        let mut node = txn.get(path).cloned().ok_or(FsError::NotFound)?;
        let out = f(&mut node)?;
        txn.insert(node)?;
        txn.commit();
        Ok(out)
    }

    /// Number of stored records; the root is not one of them.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
