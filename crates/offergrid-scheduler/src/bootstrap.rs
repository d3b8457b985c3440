//! Bootstrap queries — resolving the executor artifact.

use std::path::Path;

use offergrid_core::ExecutorInfo;
use tracing::debug;

use crate::error::{SchedulerError, SchedulerResult};

/// Resolve `path` to a canonical executor location.
///
/// A missing or unreadable artifact is a bootstrap failure.
pub fn resolve_executor(path: &Path) -> SchedulerResult<ExecutorInfo> {
    let canonical = std::fs::canonicalize(path).map_err(|e| {
        SchedulerError::Bootstrap(format!("cannot resolve executor {}: {e}", path.display()))
    })?;
    debug!(executor = %canonical.display(), "executor resolved");
    Ok(ExecutorInfo {
        uri: canonical.display().to_string(),
        data: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_existing_file_to_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("test_executor");
        std::fs::write(&exe, b"#!/bin/sh\n").unwrap();

        let info = resolve_executor(&exe).unwrap();
        assert!(Path::new(&info.uri).is_absolute());
        assert!(info.uri.ends_with("test_executor"));
        assert!(info.data.is_empty());
    }

    #[test]
    fn missing_executor_is_a_bootstrap_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_executor(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SchedulerError::Bootstrap(_)));
        assert!(err.is_fatal());
    }
}
