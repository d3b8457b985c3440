//! framework.toml configuration parser.
//!
//! Every section is optional. Missing values fall back to the defaults of
//! the reference test framework: five tasks, each asking for one cpu and
//! 32 MB, a one-second offer reply timeout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub framework: FrameworkSection,
    pub executor: ExecutorSection,
    pub task: TaskSection,
    pub offer: OfferSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkSection {
    pub name: String,
    /// Number of tasks that must finish before the framework stops.
    pub total_tasks: u64,
}

impl Default for FrameworkSection {
    fn default() -> Self {
        Self {
            name: "TestException Framework".to_string(),
            total_tasks: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSection {
    /// Executor artifact, resolved to a canonical path at bootstrap.
    pub path: String,
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            path: "./test_executor".to_string(),
        }
    }
}

/// The fixed resource request attached to every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSection {
    pub cpus: u32,
    pub mem: u32,
    pub name_prefix: String,
}

impl Default for TaskSection {
    fn default() -> Self {
        Self {
            cpus: 1,
            mem: 32,
            name_prefix: "task".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferSection {
    pub reply_timeout_secs: u64,
}

impl Default for OfferSection {
    fn default() -> Self {
        Self {
            reply_timeout_secs: 1,
        }
    }
}

impl FrameworkConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: FrameworkConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the scheduler could never complete.
    pub fn validate(&self) -> CoreResult<()> {
        if self.framework.total_tasks == 0 {
            return Err(CoreError::Invalid(
                "framework.total_tasks must be at least 1".to_string(),
            ));
        }
        if self.framework.name.trim().is_empty() {
            return Err(CoreError::Invalid("framework.name must not be empty".to_string()));
        }
        if self.executor.path.is_empty() {
            return Err(CoreError::Invalid("executor.path must not be empty".to_string()));
        }
        if self.task.cpus == 0 || self.task.mem == 0 {
            return Err(CoreError::Invalid(
                "task.cpus and task.mem must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = FrameworkConfig::from_toml_str("").unwrap();
        assert_eq!(config.framework.name, "TestException Framework");
        assert_eq!(config.framework.total_tasks, 5);
        assert_eq!(config.executor.path, "./test_executor");
        assert_eq!(config.task.cpus, 1);
        assert_eq!(config.task.mem, 32);
        assert_eq!(config.offer.reply_timeout_secs, 1);
    }

    #[test]
    fn parse_partial_sections() {
        let toml_str = r#"
[framework]
total_tasks = 3

[task]
mem = 64
"#;
        let config = FrameworkConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.framework.total_tasks, 3);
        assert_eq!(config.framework.name, "TestException Framework");
        assert_eq!(config.task.mem, 64);
        assert_eq!(config.task.cpus, 1);
    }

    #[test]
    fn zero_quota_is_rejected() {
        let err = FrameworkConfig::from_toml_str("[framework]\ntotal_tasks = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = FrameworkConfig::from_toml_str("[framework\n").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FrameworkConfig::from_file(Path::new("/nonexistent/framework.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
