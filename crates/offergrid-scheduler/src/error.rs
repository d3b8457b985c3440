//! Scheduler error types.

use offergrid_core::{TaskId, TaskState};
use thiserror::Error;

/// Errors raised by the scheduler decision engine and its callbacks.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("malformed offer {0}: no slave entries")]
    MalformedOffer(String),

    #[error("offer {0} received before registration")]
    NotRegistered(String),

    #[error("status update for unknown task {0}")]
    UnknownTask(TaskId),

    #[error("task {task_id} already terminal in {state}, rejected update to {update}")]
    TaskAlreadyTerminal {
        task_id: TaskId,
        state: TaskState,
        update: TaskState,
    },

    #[error("task {task_id}: invalid transition {from} -> {to}")]
    InvalidTransition {
        task_id: TaskId,
        from: TaskState,
        to: TaskState,
    },

    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("driver error: {0}")]
    Driver(String),

    #[error("callback failed: {0}")]
    Callback(String),
}

impl SchedulerError {
    /// Errors that must end the framework process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchedulerError::Bootstrap(_) | SchedulerError::Callback(_))
    }

    /// Errors caused by the driver violating the callback protocol.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            SchedulerError::MalformedOffer(_)
                | SchedulerError::NotRegistered(_)
                | SchedulerError::UnknownTask(_)
                | SchedulerError::TaskAlreadyTerminal { .. }
                | SchedulerError::InvalidTransition { .. }
        )
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
