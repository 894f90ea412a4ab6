//! mdbfs: a virtual filesystem whose directories, files and symlinks live as
//! records of one in-memory transactional table keyed on full paths.

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export
pub use backend::NodeOps;
pub use backends::memory::{MemFs, Node, NodeStore, RemovePolicy};
pub use config::{FsConfig, IoMode};
pub use error::{FsError, FsResult, TableError};
pub use types::*;
