//! Shared types used across OfferGrid crates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Framework-assigned task identifier. Assigned from 0 upward, never reused.
pub type TaskId = u64;

/// Resources one worker node grants to the framework for one offer cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaveOffer {
    /// The worker node advertising the resources.
    pub slave_id: String,
    /// Hostname of the worker node.
    pub host: String,
    /// Advertised resources, e.g. `cpus → "4"`, `mem → "1024"`.
    pub resources: HashMap<String, String>,
}

impl SlaveOffer {
    pub fn new(slave_id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            slave_id: slave_id.into(),
            host: host.into(),
            resources: HashMap::new(),
        }
    }

    pub fn with_resource(mut self, key: &str, value: impl ToString) -> Self {
        self.resources.insert(key.to_string(), value.to_string());
        self
    }
}

/// One offer delivery: an opaque offer id plus the per-node resource entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub slaves: Vec<SlaveOffer>,
}

impl Offer {
    pub fn new(id: impl Into<String>, slaves: Vec<SlaveOffer>) -> Self {
        Self {
            id: id.into(),
            slaves,
        }
    }
}

/// A task the framework asks the driver to launch on a specific node.
///
/// Created once by the offer evaluator and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub task_id: TaskId,
    pub slave_id: String,
    pub name: String,
    /// Requested resources, e.g. `cpus → "1"`, `mem → "32"`.
    pub params: HashMap<String, String>,
    /// Opaque payload handed to the executor.
    #[serde(default)]
    pub data: Vec<u8>,
}

/// Lifecycle state of a launched task.
///
/// `Staging` is implicit right after launch. `Finished`, `Failed`,
/// `Killed` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Staging,
    Running,
    Finished,
    Failed,
    Killed,
    Lost,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Finished | TaskState::Failed | TaskState::Killed | TaskState::Lost
        )
    }

    /// Position in the lifecycle: staging, running, terminal.
    fn rank(&self) -> u8 {
        match self {
            TaskState::Staging => 0,
            TaskState::Running => 1,
            _ => 2,
        }
    }

    /// Whether a task in `self` may move to `next`.
    ///
    /// Transitions only move forward; staging may jump straight to a
    /// terminal state.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Staging => "TASK_STAGING",
            TaskState::Running => "TASK_RUNNING",
            TaskState::Finished => "TASK_FINISHED",
            TaskState::Failed => "TASK_FAILED",
            TaskState::Killed => "TASK_KILLED",
            TaskState::Lost => "TASK_LOST",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A status report for one task, delivered by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl TaskStatus {
    pub fn new(task_id: TaskId, state: TaskState) -> Self {
        Self {
            task_id,
            state,
            data: Vec::new(),
        }
    }
}

/// Where the executor binary lives and what it is initialized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorInfo {
    /// Resolved (canonical) path or URI of the executor artifact.
    pub uri: String,
    #[serde(default)]
    pub data: Vec<u8>,
}
