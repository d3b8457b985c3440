//! Quota scheduler — runs a fixed number of tasks to completion.
//!
//! Launches one task per offer cycle until `total_tasks` have been
//! launched, then stops the driver once that many have finished.

use std::path::PathBuf;

use offergrid_core::{ExecutorInfo, FrameworkConfig, Offer, SlaveOffer, TaskStatus};
use tracing::{debug, info, warn};

use crate::bootstrap::resolve_executor;
use crate::driver::SchedulerDriver;
use crate::error::SchedulerResult;
use crate::error_handler::ErrorHandler;
use crate::evaluator::OfferEvaluator;
use crate::ledger::TaskLedger;
use crate::scheduler::Scheduler;
use crate::state::FrameworkState;
use crate::termination::TerminationPolicy;

pub struct QuotaScheduler {
    name: String,
    executor_path: PathBuf,
    state: FrameworkState,
    evaluator: OfferEvaluator,
    ledger: TaskLedger,
    termination: TerminationPolicy,
    errors: ErrorHandler,
}

impl QuotaScheduler {
    pub fn new(config: &FrameworkConfig) -> Self {
        Self {
            name: config.framework.name.clone(),
            executor_path: PathBuf::from(&config.executor.path),
            state: FrameworkState::new(config.framework.total_tasks),
            evaluator: OfferEvaluator::from_config(&config.task, &config.offer),
            ledger: TaskLedger,
            termination: TerminationPolicy,
            errors: ErrorHandler::new(),
        }
    }

    pub fn state(&self) -> &FrameworkState {
        &self.state
    }

    pub fn errors(&self) -> &ErrorHandler {
        &self.errors
    }

    /// Ask the driver to stop once the quota has finished.
    ///
    /// The framework only moves to `Stopped` after the driver accepted the
    /// request; a failed stop stays due and is retried on the next callback.
    fn request_stop(&mut self, driver: &mut dyn SchedulerDriver) -> SchedulerResult<()> {
        if !self.termination.should_stop(&self.state) {
            return Ok(());
        }
        driver.stop()?;
        self.termination.evaluate(&mut self.state);
        Ok(())
    }
}

impl Scheduler for QuotaScheduler {
    fn framework_name(&mut self) -> SchedulerResult<String> {
        Ok(self.name.clone())
    }

    fn executor_descriptor(&mut self) -> SchedulerResult<ExecutorInfo> {
        resolve_executor(&self.executor_path)
    }

    fn on_registered(&mut self, _driver: &mut dyn SchedulerDriver, framework_id: &str) {
        if let Some(previous) = self.state.framework_id() {
            warn!(%previous, %framework_id, "re-registered with new framework id");
        }
        self.state.set_registered(framework_id);
        info!(%framework_id, "registered");
    }

    fn on_offer(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        offer_id: &str,
        offers: &[SlaveOffer],
    ) -> SchedulerResult<()> {
        debug!(%offer_id, slaves = offers.len(), "got offer");
        self.request_stop(driver)?;
        let offer = Offer::new(offer_id, offers.to_vec());
        let reply = self.evaluator.evaluate(&mut self.state, &offer)?;
        let options = reply.options();
        driver.reply_to_offer(offer_id, reply.tasks, options)
    }

    fn on_status(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        status: &TaskStatus,
    ) -> SchedulerResult<()> {
        info!(task_id = status.task_id, state = %status.state, "status update");
        self.ledger.apply(&mut self.state, status)?;
        self.request_stop(driver)
    }

    fn on_error(&mut self, _driver: &mut dyn SchedulerDriver, code: i32, message: &str) {
        self.errors.on_error(code, message);
    }
}
