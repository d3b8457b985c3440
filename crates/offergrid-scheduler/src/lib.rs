//! offergrid-scheduler — the framework side of offer-based scheduling.
//!
//! A framework registers with a resource manager, receives resource
//! offers, launches tasks into them, and stops once enough tasks have
//! finished. This crate holds the decision logic; transport and task
//! execution belong to the driver.
//!
//! # Architecture
//!
//! ```text
//! driver ──on_offer──► QuotaScheduler ──► OfferEvaluator ──► reply_to_offer
//! driver ──on_status─► QuotaScheduler ──► TaskLedger ──► TerminationPolicy ──► stop
//! driver ──on_error──► QuotaScheduler ──► ErrorHandler
//!                            │
//!                            └── FrameworkState (owned, no locks)
//! ```

pub mod bootstrap;
pub mod driver;
pub mod error;
pub mod error_handler;
pub mod evaluator;
pub mod ledger;
pub mod quota;
pub mod scheduler;
pub mod state;
pub mod termination;

pub use driver::{RecordedReply, RecordingDriver, SchedulerDriver};
pub use error::{SchedulerError, SchedulerResult};
pub use error_handler::{ErrorDisposition, ErrorHandler};
pub use evaluator::{OfferEvaluator, ReplyPolicy, TaskRequest};
pub use ledger::{TaskLedger, Transition};
pub use quota::QuotaScheduler;
pub use scheduler::Scheduler;
pub use state::{FrameworkPhase, FrameworkSnapshot, FrameworkState};
pub use termination::TerminationPolicy;
