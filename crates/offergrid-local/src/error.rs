//! Local driver error types.

use offergrid_scheduler::SchedulerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalError {
    #[error("invalid master endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("remote transport is not supported (master {0}); use local or local://<slaves>")]
    RemoteUnsupported(String),

    #[error("illegal characters in executor path: {0}")]
    IllegalExecutorPath(String),

    #[error("framework failed: {0}")]
    Scheduler(#[from] SchedulerError),
}

pub type LocalResult<T> = Result<T, LocalError>;
