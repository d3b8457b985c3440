//! One-time process setup: logging and configuration.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use clap::ValueEnum;
use offergrid_core::FrameworkConfig;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

static LOGGING: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_logging(format: LogFormat) {
    LOGGING.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,offergrid=debug"));
        // stdout carries the run summary.
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        match format {
            LogFormat::Text => builder.init(),
            LogFormat::Json => builder.json().init(),
        }
    });
}

/// Load the framework config, then apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    total_tasks: Option<u64>,
    executor: Option<String>,
) -> anyhow::Result<FrameworkConfig> {
    let mut config = match path {
        Some(path) => FrameworkConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FrameworkConfig::default(),
    };
    if let Some(total_tasks) = total_tasks {
        config.framework.total_tasks = total_tasks;
    }
    if let Some(executor) = executor {
        config.executor.path = executor;
    }
    config.validate()?;
    info!(
        framework = %config.framework.name,
        total_tasks = config.framework.total_tasks,
        executor = %config.executor.path,
        "configuration loaded"
    );
    Ok(config)
}
