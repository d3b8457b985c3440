//! offergridd — runs a framework that launches a fixed quota of tasks.
//!
//! Registers with the resource manager named by the master endpoint,
//! launches one task per offer until the quota is launched, and exits 0
//! once every task has finished.
//!
//! # Usage
//!
//! ```text
//! offergridd local://3 --total-tasks 5 --executor ./test_executor
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use offergrid_local::{LocalDriver, LocalDriverConfig, LocalError, MasterEndpoint};
use offergrid_scheduler::{ErrorDisposition, ErrorHandler, QuotaScheduler};
use tracing::info;

mod bootstrap;

use bootstrap::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "offergridd", about = "OfferGrid quota framework", version)]
struct Cli {
    /// Master endpoint: `local`, `local://<slaves>`, or `host:port`.
    master: String,

    /// Framework config file (framework.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of tasks to run to completion.
    #[arg(long)]
    total_tasks: Option<u64>,

    /// Executor artifact path.
    #[arg(long)]
    executor: Option<String>,

    /// CPUs advertised by each simulated slave.
    #[arg(long, default_value = "4")]
    slave_cpus: u64,

    /// Memory (MB) advertised by each simulated slave.
    #[arg(long, default_value = "1024")]
    slave_mem: u64,

    /// Milliseconds between offers.
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    offer_interval_ms: u64,

    /// Milliseconds a simulated task runs.
    #[arg(long, default_value = "200")]
    task_duration_ms: u64,

    /// Task ids the simulated slaves report as FAILED.
    #[arg(long, value_delimiter = ',')]
    fail_tasks: Vec<u64>,

    /// Give up after this many offers.
    #[arg(long)]
    max_offers: Option<u64>,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[arg(long, value_enum, default_value = "text")]
    summary: SummaryFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bootstrap::init_logging(cli.log_format);

    let config = bootstrap::load_config(cli.config.as_deref(), cli.total_tasks, cli.executor)?;

    let endpoint = MasterEndpoint::parse(&cli.master)?;
    let slaves = match endpoint {
        MasterEndpoint::Local { slaves } => slaves,
        MasterEndpoint::Remote { .. } => {
            return Err(LocalError::RemoteUnsupported(endpoint.to_string()).into());
        }
    };
    info!(%endpoint, "connecting to master");

    let driver = LocalDriver::new(LocalDriverConfig {
        slaves,
        cpus_per_slave: cli.slave_cpus,
        mem_per_slave: cli.slave_mem,
        offer_interval: Duration::from_millis(cli.offer_interval_ms),
        task_duration: Duration::from_millis(cli.task_duration_ms),
        fail_tasks: cli.fail_tasks.into_iter().collect::<HashSet<_>>(),
        max_offers: cli.max_offers,
        ..LocalDriverConfig::default()
    });

    let mut scheduler = QuotaScheduler::new(&config);
    let summary = match driver.run(&mut scheduler).await {
        Ok(summary) => summary,
        Err(LocalError::Scheduler(e)) => {
            if let ErrorDisposition::Exit { status } = ErrorHandler::classify(&e) {
                eprintln!("fatal: {e}");
                std::process::exit(status);
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let snapshot = scheduler.state().snapshot();
    match cli.summary {
        SummaryFormat::Json => {
            let report = serde_json::json!({ "run": summary, "framework": snapshot });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        SummaryFormat::Text => {
            println!("framework {} ({})", summary.framework_name, summary.framework_id);
            println!("  offers:   {}", summary.offers_made);
            println!(
                "  tasks:    {} launched, {} finished, {} failed, {} killed, {} lost",
                snapshot.launched, snapshot.finished, snapshot.failed, snapshot.killed, snapshot.lost
            );
            println!("  errors:   {}", summary.errors_reported);
        }
    }

    if !summary.stopped {
        bail!(
            "framework did not finish: {} of {} tasks finished",
            snapshot.finished,
            snapshot.total_quota
        );
    }
    info!("framework finished");
    Ok(())
}
