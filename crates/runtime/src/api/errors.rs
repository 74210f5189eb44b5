//! Unified error types surfaced by the runtime API.
//!
//! Gameplay never fails; these cover setup and task coordination only.
use thiserror::Error;

use hive_core::ConfigError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("notifier capacity must be greater than 0")]
    ZeroNotifierCapacity,

    #[error("decision worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("notifier join failed")]
    NotifierJoin(#[source] tokio::task::JoinError),
}
