//! The callback contract a framework scheduler exposes to its driver.
//!
//! The driver calls these serially. `framework_name` and
//! `executor_descriptor` are queried once before registration; an error
//! from either is fatal to the framework process.

use offergrid_core::{ExecutorInfo, SlaveOffer, TaskStatus};

use crate::driver::SchedulerDriver;
use crate::error::SchedulerResult;

pub trait Scheduler {
    fn framework_name(&mut self) -> SchedulerResult<String>;

    fn executor_descriptor(&mut self) -> SchedulerResult<ExecutorInfo>;

    fn on_registered(&mut self, driver: &mut dyn SchedulerDriver, framework_id: &str);

    fn on_offer(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        offer_id: &str,
        offers: &[SlaveOffer],
    ) -> SchedulerResult<()>;

    fn on_status(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        status: &TaskStatus,
    ) -> SchedulerResult<()>;

    fn on_error(&mut self, driver: &mut dyn SchedulerDriver, code: i32, message: &str);
}
