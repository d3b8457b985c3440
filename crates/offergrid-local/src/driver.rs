//! Local driver — delivers callbacks to a scheduler from an in-process cluster.
//!
//! Offer ticks and task status reports are funnelled through one mpsc
//! channel and consumed by a single loop, so the scheduler sees strictly
//! serial callbacks and needs no locking.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use offergrid_core::{ExecutorInfo, TaskDescriptor, TaskId, TaskState, TaskStatus};
use offergrid_scheduler::{Scheduler, SchedulerDriver, SchedulerError, SchedulerResult};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::cluster::LocalCluster;
use crate::error::LocalResult;
use crate::launch::LaunchPlan;

/// Error code passed to `on_error` when a callback violated the protocol.
pub const PROTOCOL_ERROR: i32 = 1;
/// Error code passed to `on_error` when a launched task could not be placed.
pub const TASK_REJECTED: i32 = 2;

static NEXT_FRAMEWORK: AtomicU64 = AtomicU64::new(0);

fn next_framework_id() -> String {
    format!("local-{:04}", NEXT_FRAMEWORK.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone)]
pub struct LocalDriverConfig {
    pub slaves: usize,
    pub cpus_per_slave: u64,
    pub mem_per_slave: u64,
    pub offer_interval: Duration,
    /// How long a simulated task takes from launch to its terminal state.
    pub task_duration: Duration,
    /// Tasks that end FAILED instead of FINISHED.
    pub fail_tasks: HashSet<TaskId>,
    /// Stop offering after this many offer ticks, counting ticks where no
    /// slave had free resources; the run then ends once no task is in flight.
    pub max_offers: Option<u64>,
    pub work_root: PathBuf,
}

impl Default for LocalDriverConfig {
    fn default() -> Self {
        Self {
            slaves: 1,
            cpus_per_slave: 4,
            mem_per_slave: 1024,
            offer_interval: Duration::from_millis(100),
            task_duration: Duration::from_millis(200),
            fail_tasks: HashSet::new(),
            max_offers: None,
            work_root: std::env::temp_dir().join("offergrid"),
        }
    }
}

/// Outcome of one framework run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub framework_id: String,
    pub framework_name: String,
    pub offers_made: u64,
    pub tasks_launched: u64,
    pub status_updates: u64,
    pub errors_reported: u64,
    /// Whether the framework asked the driver to stop.
    pub stopped: bool,
}

#[derive(Debug)]
enum DriverEvent {
    OfferTick,
    Status(TaskStatus),
}

/// The action surface handed to the scheduler during callbacks.
struct LocalActions {
    framework_id: String,
    executor: ExecutorInfo,
    work_root: PathBuf,
    task_duration: Duration,
    fail_tasks: HashSet<TaskId>,
    cluster: LocalCluster,
    events: mpsc::UnboundedSender<DriverEvent>,
    stopped: bool,
    tasks_launched: u64,
    /// Tasks handed to the driver whose terminal status is not yet delivered.
    pending: HashSet<TaskId>,
    /// Tasks refused during the last reply, with the reason.
    rejected: Vec<(TaskId, String)>,
}

impl LocalActions {
    fn launch(&mut self, task: &TaskDescriptor) -> Result<(), String> {
        let plan = LaunchPlan::build(
            &self.framework_id,
            &task.slave_id,
            &self.executor.uri,
            &self.work_root,
            &task.params,
        )
        .map_err(|e| e.to_string())?;
        self.cluster.place(task)?;
        debug!(
            task_id = task.task_id,
            work_dir = %plan.work_dir.display(),
            command = ?plan.command(),
            "executor launch planned"
        );

        let events = self.events.clone();
        let task_id = task.task_id;
        let half = self.task_duration / 2;
        let rest = self.task_duration - half;
        let terminal = if self.fail_tasks.contains(&task_id) {
            TaskState::Failed
        } else {
            TaskState::Finished
        };
        tokio::spawn(async move {
            tokio::time::sleep(half).await;
            let running = TaskStatus::new(task_id, TaskState::Running);
            if events.send(DriverEvent::Status(running)).is_err() {
                return;
            }
            tokio::time::sleep(rest).await;
            let _ = events.send(DriverEvent::Status(TaskStatus::new(task_id, terminal)));
        });
        Ok(())
    }
}

impl SchedulerDriver for LocalActions {
    fn reply_to_offer(
        &mut self,
        offer_id: &str,
        tasks: Vec<TaskDescriptor>,
        options: HashMap<String, String>,
    ) -> SchedulerResult<()> {
        if self.stopped {
            return Err(SchedulerError::Driver(format!(
                "reply to {offer_id} after driver stopped"
            )));
        }
        debug!(%offer_id, tasks = tasks.len(), ?options, "offer reply");
        for task in &tasks {
            self.pending.insert(task.task_id);
            match self.launch(task) {
                Ok(()) => {
                    self.tasks_launched += 1;
                    info!(task_id = task.task_id, slave_id = %task.slave_id, "task started");
                }
                Err(reason) => self.rejected.push((task.task_id, reason)),
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> SchedulerResult<()> {
        if !self.stopped {
            info!(framework_id = %self.framework_id, "driver stop requested");
        }
        self.stopped = true;
        Ok(())
    }
}

/// Report a failed callback back to the scheduler, or end the run if fatal.
fn report<S: Scheduler>(
    scheduler: &mut S,
    actions: &mut LocalActions,
    errors_reported: &mut u64,
    result: SchedulerResult<()>,
) -> LocalResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "callback failed");
            *errors_reported += 1;
            scheduler.on_error(actions, PROTOCOL_ERROR, &e.to_string());
            Ok(())
        }
    }
}

pub struct LocalDriver {
    config: LocalDriverConfig,
}

impl LocalDriver {
    pub fn new(config: LocalDriverConfig) -> Self {
        Self { config }
    }

    /// Run `scheduler` until it stops the driver or the offer budget runs out.
    ///
    /// A failure in either bootstrap query ends the run with an error
    /// before registration.
    pub async fn run<S: Scheduler>(self, scheduler: &mut S) -> LocalResult<RunSummary> {
        let framework_name = scheduler.framework_name()?;
        let executor = scheduler.executor_descriptor()?;
        let framework_id = next_framework_id();
        info!(%framework_name, %framework_id, executor = %executor.uri, "framework bootstrapped");

        let config = self.config;
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut actions = LocalActions {
            framework_id: framework_id.clone(),
            executor,
            work_root: config.work_root.clone(),
            task_duration: config.task_duration,
            fail_tasks: config.fail_tasks.clone(),
            cluster: LocalCluster::new(config.slaves, config.cpus_per_slave, config.mem_per_slave),
            events: events_tx.clone(),
            stopped: false,
            tasks_launched: 0,
            pending: HashSet::new(),
            rejected: Vec::new(),
        };

        scheduler.on_registered(&mut actions, &framework_id);

        // ── Offer ticker ─────────────────────────────────────────
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let offer_interval = config.offer_interval;
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(offer_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if events_tx.send(DriverEvent::OfferTick).is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        // ── Event loop ───────────────────────────────────────────
        let mut offer_ticks = 0u64;
        let mut status_updates = 0u64;
        let mut errors_reported = 0u64;

        while let Some(event) = events_rx.recv().await {
            match event {
                DriverEvent::OfferTick => {
                    let exhausted = config
                        .max_offers
                        .is_some_and(|max| offer_ticks >= max);
                    if exhausted {
                        if actions.pending.is_empty() {
                            info!("offer budget exhausted with no tasks in flight");
                            break;
                        }
                        continue;
                    }
                    offer_ticks += 1;
                    let Some(offer) = actions.cluster.make_offer() else {
                        continue;
                    };
                    let result = scheduler.on_offer(&mut actions, &offer.id, &offer.slaves);
                    report(scheduler, &mut actions, &mut errors_reported, result)?;

                    for (task_id, reason) in std::mem::take(&mut actions.rejected) {
                        warn!(task_id, %reason, "task rejected by slave");
                        errors_reported += 1;
                        scheduler.on_error(&mut actions, TASK_REJECTED, &reason);
                        let lost = TaskStatus::new(task_id, TaskState::Lost);
                        let _ = actions.events.send(DriverEvent::Status(lost));
                    }
                }
                DriverEvent::Status(status) => {
                    if status.state.is_terminal() {
                        actions.cluster.release(status.task_id);
                        actions.pending.remove(&status.task_id);
                    }
                    status_updates += 1;
                    let result = scheduler.on_status(&mut actions, &status);
                    report(scheduler, &mut actions, &mut errors_reported, result)?;
                }
            }

            if actions.stopped {
                break;
            }
        }

        let _ = shutdown_tx.send(true);
        let _ = ticker.await;

        let summary = RunSummary {
            framework_id,
            framework_name,
            offers_made: actions.cluster.offers_made(),
            tasks_launched: actions.tasks_launched,
            status_updates,
            errors_reported,
            stopped: actions.stopped,
        };
        info!(
            ?summary,
            in_flight = actions.cluster.tasks_in_flight(),
            "framework run ended"
        );
        Ok(summary)
    }
}
