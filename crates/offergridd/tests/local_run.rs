//! End-to-end runs of the quota framework against the in-process cluster.

use std::collections::HashSet;
use std::time::Duration;

use offergrid_core::{ExecutorInfo, FrameworkConfig, SlaveOffer, TaskState, TaskStatus};
use offergrid_local::{LocalDriver, LocalDriverConfig, LocalError};
use offergrid_scheduler::*;
use tempfile::TempDir;

fn executor_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test_executor"), b"#!/bin/sh\nexit 0\n").unwrap();
    dir
}

fn quota_scheduler(dir: &TempDir, total_tasks: u64) -> QuotaScheduler {
    let mut config = FrameworkConfig::default();
    config.framework.total_tasks = total_tasks;
    config.executor.path = dir.path().join("test_executor").display().to_string();
    QuotaScheduler::new(&config)
}

fn driver_config(dir: &TempDir) -> LocalDriverConfig {
    LocalDriverConfig {
        slaves: 2,
        offer_interval: Duration::from_millis(5),
        task_duration: Duration::from_millis(10),
        work_root: dir.path().join("work"),
        ..LocalDriverConfig::default()
    }
}

#[tokio::test]
async fn five_tasks_finish_and_framework_stops() {
    let dir = executor_dir();
    let mut scheduler = quota_scheduler(&dir, 5);

    let summary = LocalDriver::new(driver_config(&dir))
        .run(&mut scheduler)
        .await
        .unwrap();

    assert!(summary.stopped);
    assert_eq!(summary.framework_name, "TestException Framework");
    assert_eq!(summary.tasks_launched, 5);
    // RUNNING + FINISHED for every task.
    assert_eq!(summary.status_updates, 10);

    let snapshot = scheduler.state().snapshot();
    assert_eq!(snapshot.launched, 5);
    assert_eq!(snapshot.finished, 5);
    assert_eq!(snapshot.phase, FrameworkPhase::Stopped);
    for id in 0..5 {
        assert_eq!(scheduler.state().task_state(id), Some(TaskState::Finished));
    }
}

#[tokio::test]
async fn failed_task_leaves_framework_running_until_offers_run_out() {
    let dir = executor_dir();
    let mut scheduler = quota_scheduler(&dir, 5);
    let config = LocalDriverConfig {
        fail_tasks: HashSet::from([2]),
        max_offers: Some(20),
        ..driver_config(&dir)
    };

    let summary = LocalDriver::new(config).run(&mut scheduler).await.unwrap();

    assert!(!summary.stopped);
    assert_eq!(summary.tasks_launched, 5);
    let snapshot = scheduler.state().snapshot();
    assert_eq!(snapshot.finished, 4);
    assert_eq!(snapshot.failed, 1);
    assert_eq!(snapshot.phase, FrameworkPhase::Running);
}

/// A framework whose name query blows up, like an out-of-bounds access.
struct FaultyName;

impl Scheduler for FaultyName {
    fn framework_name(&mut self) -> SchedulerResult<String> {
        let names = ["a", "b"];
        names
            .get(2)
            .map(|s| s.to_string())
            .ok_or_else(|| SchedulerError::Callback("index 2 out of bounds for length 2".into()))
    }

    fn executor_descriptor(&mut self) -> SchedulerResult<ExecutorInfo> {
        Ok(ExecutorInfo {
            uri: "/bin/true".to_string(),
            data: Vec::new(),
        })
    }

    fn on_registered(&mut self, _driver: &mut dyn SchedulerDriver, _framework_id: &str) {
        panic!("must not register after a failed bootstrap query");
    }

    fn on_offer(
        &mut self,
        _driver: &mut dyn SchedulerDriver,
        _offer_id: &str,
        _offers: &[SlaveOffer],
    ) -> SchedulerResult<()> {
        Ok(())
    }

    fn on_status(
        &mut self,
        _driver: &mut dyn SchedulerDriver,
        _status: &TaskStatus,
    ) -> SchedulerResult<()> {
        Ok(())
    }

    fn on_error(&mut self, _driver: &mut dyn SchedulerDriver, _code: i32, _message: &str) {}
}

#[tokio::test]
async fn callback_defect_propagates_out_of_the_driver() {
    let dir = executor_dir();

    let err = LocalDriver::new(driver_config(&dir))
        .run(&mut FaultyName)
        .await
        .unwrap_err();

    match err {
        LocalError::Scheduler(e) => {
            assert!(e.is_fatal());
            assert_eq!(
                ErrorHandler::classify(&e),
                ErrorDisposition::Exit { status: 1 }
            );
        }
        other => panic!("expected scheduler error, got {other:?}"),
    }
}
