//! offergrid-core — types shared by the framework scheduler, the local
//! driver, and the daemon.

pub mod config;
pub mod error;
pub mod types;

pub use config::FrameworkConfig;
pub use error::{CoreError, CoreResult};
pub use types::*;
