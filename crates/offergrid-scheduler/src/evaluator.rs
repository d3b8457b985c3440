//! Offer evaluator — turns one offer delivery into a reply.
//!
//! At most one task is launched per offer cycle, always on the first slave
//! entry, with a fixed resource request. The request is not checked against
//! what the slave advertises.

use std::collections::HashMap;
use std::time::Duration;

use offergrid_core::config::{OfferSection, TaskSection};
use offergrid_core::{Offer, TaskDescriptor};
use tracing::{debug, info};

use crate::error::{SchedulerError, SchedulerResult};
use crate::state::{FrameworkPhase, FrameworkState};

/// The constant per-task resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub cpus: u32,
    pub mem: u32,
    pub name_prefix: String,
}

impl TaskRequest {
    pub fn params(&self) -> HashMap<String, String> {
        HashMap::from([
            ("cpus".to_string(), self.cpus.to_string()),
            ("mem".to_string(), self.mem.to_string()),
        ])
    }
}

impl Default for TaskRequest {
    fn default() -> Self {
        Self::from(&TaskSection::default())
    }
}

impl From<&TaskSection> for TaskRequest {
    fn from(section: &TaskSection) -> Self {
        Self {
            cpus: section.cpus,
            mem: section.mem,
            name_prefix: section.name_prefix.clone(),
        }
    }
}

/// The reply for one offer cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPolicy {
    pub timeout: Duration,
    pub tasks: Vec<TaskDescriptor>,
}

impl ReplyPolicy {
    /// Options map passed alongside the reply, e.g. `timeout → "1"`.
    pub fn options(&self) -> HashMap<String, String> {
        HashMap::from([("timeout".to_string(), self.timeout.as_secs().to_string())])
    }
}

#[derive(Debug, Clone)]
pub struct OfferEvaluator {
    request: TaskRequest,
    reply_timeout: Duration,
}

impl OfferEvaluator {
    pub fn new(request: TaskRequest, reply_timeout: Duration) -> Self {
        Self {
            request,
            reply_timeout,
        }
    }

    pub fn from_config(task: &TaskSection, offer: &OfferSection) -> Self {
        Self::new(
            TaskRequest::from(task),
            Duration::from_secs(offer.reply_timeout_secs),
        )
    }

    /// Decide what to launch for `offer`.
    ///
    /// The launched counter is bumped here, together with building the
    /// descriptor, so every counted task is in the returned reply.
    pub fn evaluate(
        &self,
        state: &mut FrameworkState,
        offer: &Offer,
    ) -> SchedulerResult<ReplyPolicy> {
        let mut tasks = Vec::new();

        match state.phase() {
            FrameworkPhase::Unregistered => {
                return Err(SchedulerError::NotRegistered(offer.id.clone()));
            }
            FrameworkPhase::Stopped => {
                debug!(offer_id = %offer.id, "framework stopped, declining offer");
                return Ok(self.reply(tasks));
            }
            FrameworkPhase::Registered | FrameworkPhase::Running => {}
        }

        // A malformed offer leaves the phase untouched.
        let slave = if state.quota_reached() {
            None
        } else {
            let first = offer
                .slaves
                .first()
                .ok_or_else(|| SchedulerError::MalformedOffer(offer.id.clone()))?;
            Some(first)
        };

        if state.phase() == FrameworkPhase::Registered {
            state.set_phase(FrameworkPhase::Running);
        }

        let Some(slave) = slave else {
            debug!(
                offer_id = %offer.id,
                launched = state.launched_count(),
                "quota reached, declining offer"
            );
            return Ok(self.reply(tasks));
        };

        let task_id = state.launch_next();
        info!(
            offer_id = %offer.id,
            task_id,
            slave_id = %slave.slave_id,
            "launching task"
        );
        tasks.push(TaskDescriptor {
            task_id,
            slave_id: slave.slave_id.clone(),
            name: format!("{} {task_id}", self.request.name_prefix),
            params: self.request.params(),
            data: Vec::new(),
        });

        Ok(self.reply(tasks))
    }

    fn reply(&self, tasks: Vec<TaskDescriptor>) -> ReplyPolicy {
        ReplyPolicy {
            timeout: self.reply_timeout,
            tasks,
        }
    }
}

impl Default for OfferEvaluator {
    fn default() -> Self {
        Self::from_config(&TaskSection::default(), &OfferSection::default())
    }
}
