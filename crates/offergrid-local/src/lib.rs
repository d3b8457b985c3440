//! offergrid-local — run a framework against an in-process resource manager.
//!
//! Stands in for a remote master so a framework can be exercised end to
//! end inside one process.
//!
//! # Architecture
//!
//! ```text
//! LocalDriver::run
//!   ├── bootstrap queries (framework_name, executor_descriptor)
//!   ├── on_registered
//!   └── event loop (single consumer)
//!       ├── offer ticker ──► LocalCluster::make_offer ──► on_offer
//!       │                         reply_to_offer ──► LaunchPlan + simulated task
//!       └── mpsc<DriverEvent> ◄── simulated tasks (RUNNING, then terminal)
//!                                 ──► on_status ──► stop?
//! ```

pub mod cluster;
pub mod driver;
pub mod endpoint;
pub mod error;
pub mod launch;

pub use cluster::{LocalCluster, SimulatedSlave};
pub use driver::{LocalDriver, LocalDriverConfig, RunSummary};
pub use endpoint::MasterEndpoint;
pub use error::{LocalError, LocalResult};
pub use launch::{LaunchPlan, LaunchStep};
