//! Error handler — classifies error notifications and fatal failures.
//!
//! Errors delivered by the driver through the error callback never alter
//! framework state. Bootstrap failures and callback defects end the process.

use tracing::{error, warn};

use crate::error::SchedulerError;

/// What the caller should do after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    Continue,
    Exit { status: i32 },
}

/// One error notification received from the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ErrorHandler {
    count: u64,
    last: Option<ErrorNotice>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a driver error notification. Always non-fatal.
    pub fn on_error(&mut self, code: i32, message: &str) -> ErrorDisposition {
        self.count += 1;
        warn!(code, %message, total = self.count, "error notification from driver");
        self.last = Some(ErrorNotice {
            code,
            message: message.to_string(),
        });
        ErrorDisposition::Continue
    }

    /// Classify an error returned across the callback boundary.
    pub fn classify(err: &SchedulerError) -> ErrorDisposition {
        if err.is_fatal() {
            error!(error = %err, "fatal framework error");
            ErrorDisposition::Exit { status: 1 }
        } else {
            ErrorDisposition::Continue
        }
    }

    pub fn error_count(&self) -> u64 {
        self.count
    }

    pub fn last_error(&self) -> Option<&ErrorNotice> {
        self.last.as_ref()
    }
}
