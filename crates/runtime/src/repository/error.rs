//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("character repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid character name {0:?}")]
    InvalidName(String),

    #[error("no writable data directory could be determined")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
