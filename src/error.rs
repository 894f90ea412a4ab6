use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the transactional table itself.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TableError {
    #[error("unique index violation: id {id:#018x} of {key:?} already owned by {owner:?}")]
    UniqueViolation { id: u64, key: String, owner: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FsError {
    #[error("not found")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("is a directory")]
    IsADirectory,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("directory not empty")]
    DirectoryNotEmpty,

    #[error("file too large")]
    FileTooLarge,

    #[error("operation not supported")]
    Unimplemented,

    // surfaced verbatim, the handlers cannot recover a failed transaction
    #[error(transparent)]
    Store(#[from] TableError),
}

impl FsError {
    /// Host status code a transport adapter should reply with.
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::NotADirectory => libc::ENOTDIR,
            FsError::IsADirectory => libc::EISDIR,
            FsError::InvalidArgument => libc::EINVAL,
            FsError::DirectoryNotEmpty => libc::ENOTEMPTY,
            FsError::FileTooLarge => libc::EFBIG,
            FsError::Unimplemented => libc::ENOSYS,
            FsError::Store(_) => libc::EIO,
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid log filter {directive:?}: {reason}")]
    LogFilter { directive: String, reason: String },
}
