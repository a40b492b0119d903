//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule failures, worker coordination and repository failures so
//! clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{CombatError, ErrorSeverity, GameError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("runtime requires content oracles to be configured before building")]
    MissingOracles,

    #[error("runtime requires a character before building")]
    MissingCharacter,

    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("failed to load content: {0}")]
    ContentLoad(String),
}

impl RuntimeError {
    /// Severity of the underlying rule error, if this wraps one.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Combat(err) => err.severity(),
            Self::MissingOracles
            | Self::MissingCharacter
            | Self::UnknownClass(_)
            | Self::ContentLoad(_) => ErrorSeverity::Fatal,
            Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_)
            | Self::Repository(_) => ErrorSeverity::Internal,
        }
    }
}
