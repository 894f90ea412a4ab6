//! In-memory filesystem: node records in a path-keyed transactional table.

mod fs;
mod node;
mod store;
mod table;

pub use fs::MemFs;
pub use node::{
    DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, DEFAULT_SYMLINK_PERM, MAX_SYMLINK_TARGET, Node,
    ROOT_PATH, child_path, derive_id, is_valid_name,
};
pub use store::{NodeStore, RemovePolicy};
pub use table::{ReadTxn, Record, Table, WriteTxn};
