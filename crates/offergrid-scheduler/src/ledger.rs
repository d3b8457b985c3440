//! Task ledger — applies status updates to the framework state.
//!
//! ```text
//! STAGING ──► RUNNING ──► FINISHED | FAILED | KILLED | LOST
//!    └───────────────────────▲
//! ```
//!
//! Only FINISHED counts toward completion. Failed, killed and lost tasks
//! are recorded and never relaunched.

use offergrid_core::{TaskId, TaskState, TaskStatus};
use tracing::{info, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::state::FrameworkState;

/// One applied state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub task_id: TaskId,
    pub from: TaskState,
    pub to: TaskState,
}

impl Transition {
    pub fn completed(&self) -> bool {
        self.to == TaskState::Finished
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLedger;

impl TaskLedger {
    /// Apply `status` to `state`.
    ///
    /// Updates for unknown tasks, for tasks already terminal, and backward
    /// moves are rejected and leave `state` untouched.
    pub fn apply(
        &self,
        state: &mut FrameworkState,
        status: &TaskStatus,
    ) -> SchedulerResult<Transition> {
        let task_id = status.task_id;
        let from = state
            .task_state(task_id)
            .ok_or(SchedulerError::UnknownTask(task_id))?;

        if from.is_terminal() {
            warn!(task_id, %from, update = %status.state, "update after terminal state");
            return Err(SchedulerError::TaskAlreadyTerminal {
                task_id,
                state: from,
                update: status.state,
            });
        }
        if !from.can_transition_to(status.state) {
            warn!(task_id, %from, to = %status.state, "out-of-order status update");
            return Err(SchedulerError::InvalidTransition {
                task_id,
                from,
                to: status.state,
            });
        }

        state.record_transition(task_id, status.state);

        match status.state {
            TaskState::Finished => info!(
                task_id,
                finished = state.finished_count(),
                total = state.total_quota(),
                "task finished"
            ),
            TaskState::Failed | TaskState::Killed | TaskState::Lost => warn!(
                task_id,
                state = %status.state,
                "task ended without finishing, not relaunching"
            ),
            TaskState::Staging | TaskState::Running => {}
        }

        Ok(Transition {
            task_id,
            from,
            to: status.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launched(n: u64) -> FrameworkState {
        let mut state = FrameworkState::new(n);
        for _ in 0..n {
            state.launch_next();
        }
        state
    }

    #[test]
    fn finished_increments_by_one() {
        let mut state = launched(2);
        let ledger = TaskLedger;

        let t = ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Finished))
            .unwrap();
        assert!(t.completed());
        assert_eq!(t.from, TaskState::Staging);
        assert_eq!(state.finished_count(), 1);
    }

    #[test]
    fn running_then_finished() {
        let mut state = launched(1);
        let ledger = TaskLedger;

        let t = ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Running))
            .unwrap();
        assert!(!t.completed());
        assert_eq!(state.finished_count(), 0);

        ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Finished))
            .unwrap();
        assert_eq!(state.finished_count(), 1);
        assert_eq!(state.task_state(0), Some(TaskState::Finished));
    }

    #[test]
    fn non_success_terminal_states_do_not_count() {
        let mut state = launched(3);
        let ledger = TaskLedger;

        for (id, s) in [(0, TaskState::Failed), (1, TaskState::Killed), (2, TaskState::Lost)] {
            ledger.apply(&mut state, &TaskStatus::new(id, s)).unwrap();
        }

        assert_eq!(state.finished_count(), 0);
        let snap = state.snapshot();
        assert_eq!((snap.failed, snap.killed, snap.lost), (1, 1, 1));
    }

    #[test]
    fn unknown_task_is_rejected() {
        let mut state = launched(1);
        let err = TaskLedger
            .apply(&mut state, &TaskStatus::new(7, TaskState::Finished))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::UnknownTask(7)));
        assert_eq!(state.finished_count(), 0);
    }

    #[test]
    fn update_after_terminal_is_rejected() {
        let mut state = launched(1);
        let ledger = TaskLedger;
        ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Finished))
            .unwrap();

        let err = ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Finished))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::TaskAlreadyTerminal { task_id: 0, .. }));
        assert_eq!(state.finished_count(), 1);

        let err = ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Running))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::TaskAlreadyTerminal { .. }));
    }

    #[test]
    fn backward_transition_is_rejected() {
        let mut state = launched(1);
        let ledger = TaskLedger;
        ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Running))
            .unwrap();

        let err = ledger
            .apply(&mut state, &TaskStatus::new(0, TaskState::Staging))
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidTransition {
                from: TaskState::Running,
                to: TaskState::Staging,
                ..
            }
        ));
        assert_eq!(state.task_state(0), Some(TaskState::Running));
    }
}
