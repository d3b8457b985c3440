//! Driver action surface — what a scheduler may ask the driver to do.

use std::collections::HashMap;

use offergrid_core::TaskDescriptor;

use crate::error::{SchedulerError, SchedulerResult};

/// Actions implemented by the driver and invoked from scheduler callbacks.
pub trait SchedulerDriver {
    /// Answer an offer with the tasks to launch (possibly none).
    fn reply_to_offer(
        &mut self,
        offer_id: &str,
        tasks: Vec<TaskDescriptor>,
        options: HashMap<String, String>,
    ) -> SchedulerResult<()>;

    /// Ask the driver to shut the framework down.
    fn stop(&mut self) -> SchedulerResult<()>;
}

/// A reply captured by [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReply {
    pub offer_id: String,
    pub tasks: Vec<TaskDescriptor>,
    pub options: HashMap<String, String>,
}

/// Driver that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub replies: Vec<RecordedReply>,
    pub stop_calls: u32,
    /// When set, every reply fails with this message.
    pub reject_replies: Option<String>,
    /// When set, every stop request fails with this message.
    pub reject_stop: Option<String>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched_ids(&self) -> Vec<u64> {
        self.replies
            .iter()
            .flat_map(|r| r.tasks.iter().map(|t| t.task_id))
            .collect()
    }
}

impl SchedulerDriver for RecordingDriver {
    fn reply_to_offer(
        &mut self,
        offer_id: &str,
        tasks: Vec<TaskDescriptor>,
        options: HashMap<String, String>,
    ) -> SchedulerResult<()> {
        if let Some(reason) = &self.reject_replies {
            return Err(SchedulerError::Driver(reason.clone()));
        }
        self.replies.push(RecordedReply {
            offer_id: offer_id.to_string(),
            tasks,
            options,
        });
        Ok(())
    }

    fn stop(&mut self) -> SchedulerResult<()> {
        if let Some(reason) = &self.reject_stop {
            return Err(SchedulerError::Driver(reason.clone()));
        }
        self.stop_calls += 1;
        Ok(())
    }
}
