//! Framework state — task counters, per-task states, and lifecycle phase.
//!
//! Owned exclusively by one scheduler instance and mutated only from
//! inside callbacks, so no locking is involved.

use std::collections::BTreeMap;
use std::fmt;

use offergrid_core::{TaskId, TaskState};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkPhase {
    Unregistered,
    Registered,
    Running,
    Stopped,
}

impl fmt::Display for FrameworkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkPhase::Unregistered => write!(f, "unregistered"),
            FrameworkPhase::Registered => write!(f, "registered"),
            FrameworkPhase::Running => write!(f, "running"),
            FrameworkPhase::Stopped => write!(f, "stopped"),
        }
    }
}

/// Mutable record of the framework's progress.
///
/// Invariant after every update: `finished <= launched <= total_quota`.
#[derive(Debug, Clone)]
pub struct FrameworkState {
    framework_id: Option<String>,
    phase: FrameworkPhase,
    total_quota: u64,
    launched: u64,
    finished: u64,
    failed: u64,
    killed: u64,
    lost: u64,
    /// Latest known state of every launched task.
    tasks: BTreeMap<TaskId, TaskState>,
}

impl FrameworkState {
    pub fn new(total_quota: u64) -> Self {
        Self {
            framework_id: None,
            phase: FrameworkPhase::Unregistered,
            total_quota,
            launched: 0,
            finished: 0,
            failed: 0,
            killed: 0,
            lost: 0,
            tasks: BTreeMap::new(),
        }
    }

    pub fn framework_id(&self) -> Option<&str> {
        self.framework_id.as_deref()
    }

    pub fn phase(&self) -> FrameworkPhase {
        self.phase
    }

    pub fn total_quota(&self) -> u64 {
        self.total_quota
    }

    pub fn launched_count(&self) -> u64 {
        self.launched
    }

    pub fn finished_count(&self) -> u64 {
        self.finished
    }

    pub fn task_state(&self, task_id: TaskId) -> Option<TaskState> {
        self.tasks.get(&task_id).copied()
    }

    pub fn quota_reached(&self) -> bool {
        self.launched >= self.total_quota
    }

    pub(crate) fn set_registered(&mut self, framework_id: &str) {
        self.framework_id = Some(framework_id.to_string());
        if self.phase == FrameworkPhase::Unregistered {
            self.phase = FrameworkPhase::Registered;
        }
    }

    pub(crate) fn set_phase(&mut self, phase: FrameworkPhase) {
        self.phase = phase;
    }

    /// Reserve the next task id and record the task as staging.
    pub(crate) fn launch_next(&mut self) -> TaskId {
        let task_id = self.launched;
        self.launched += 1;
        self.tasks.insert(task_id, TaskState::Staging);
        task_id
    }

    pub(crate) fn record_transition(&mut self, task_id: TaskId, to: TaskState) {
        self.tasks.insert(task_id, to);
        match to {
            TaskState::Finished => self.finished += 1,
            TaskState::Failed => self.failed += 1,
            TaskState::Killed => self.killed += 1,
            TaskState::Lost => self.lost += 1,
            TaskState::Staging | TaskState::Running => {}
        }
        debug_assert!(self.finished <= self.launched && self.launched <= self.total_quota);
    }

    /// A serializable copy of the counters, for run summaries.
    pub fn snapshot(&self) -> FrameworkSnapshot {
        let running = self
            .tasks
            .values()
            .filter(|s| **s == TaskState::Running)
            .count() as u64;
        FrameworkSnapshot {
            framework_id: self.framework_id.clone(),
            phase: self.phase,
            total_quota: self.total_quota,
            launched: self.launched,
            running,
            finished: self.finished,
            failed: self.failed,
            killed: self.killed,
            lost: self.lost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSnapshot {
    pub framework_id: Option<String>,
    pub phase: FrameworkPhase,
    pub total_quota: u64,
    pub launched: u64,
    pub running: u64,
    pub finished: u64,
    pub failed: u64,
    pub killed: u64,
    pub lost: u64,
}
