//! Executor launch planning.
//!
//! Works out how a slave would start a framework's executor: working
//! directory, fetch and unpack steps, environment, command. Nothing is
//! executed here.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{LocalError, LocalResult};

/// Task parameters with this prefix are exported to the executor's environment.
const ENV_PARAM_PREFIX: &str = "env.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LaunchStep {
    CreateWorkDir { path: PathBuf },
    /// Copy the executor out of HDFS into the work directory.
    FetchHdfs { uri: String, local: PathBuf },
    /// Untar an executor archive; it must hold exactly one directory.
    Unpack { archive: PathBuf },
    Exec { command: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub work_dir: PathBuf,
    pub env: BTreeMap<String, String>,
    pub steps: Vec<LaunchStep>,
}

impl LaunchPlan {
    pub fn build(
        framework_id: &str,
        slave_id: &str,
        executor_uri: &str,
        work_root: &Path,
        params: &HashMap<String, String>,
    ) -> LocalResult<Self> {
        // The path ends up quoted inside shell commands.
        if executor_uri.contains(['\\', '\'', '\0']) {
            return Err(LocalError::IllegalExecutorPath(executor_uri.to_string()));
        }

        let work_dir = work_root.join(framework_id).join(slave_id);
        let mut steps = vec![LaunchStep::CreateWorkDir {
            path: work_dir.clone(),
        }];

        let mut executor = PathBuf::from(executor_uri);
        if executor_uri.starts_with("hdfs://") {
            let file_name = executor_uri.rsplit('/').next().unwrap_or(executor_uri);
            let local = PathBuf::from(".").join(file_name);
            steps.push(LaunchStep::FetchHdfs {
                uri: executor_uri.to_string(),
                local: local.clone(),
            });
            executor = local;
        }
        if executor_uri.ends_with(".tgz") {
            steps.push(LaunchStep::Unpack { archive: executor });
            executor = PathBuf::from("./executor");
        }
        steps.push(LaunchStep::Exec { command: executor });

        let mut env: BTreeMap<String, String> = params
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(ENV_PARAM_PREFIX)
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.to_string(), v.clone()))
            })
            .collect();
        env.insert("OFFERGRID_FRAMEWORK_ID".to_string(), framework_id.to_string());
        env.insert("OFFERGRID_SLAVE_ID".to_string(), slave_id.to_string());
        env.insert("OFFERGRID_EXECUTOR_URI".to_string(), executor_uri.to_string());

        Ok(Self {
            work_dir,
            env,
            steps,
        })
    }

    /// The program the slave would finally execute.
    pub fn command(&self) -> Option<&Path> {
        self.steps.iter().rev().find_map(|step| match step {
            LaunchStep::Exec { command } => Some(command.as_path()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn plain_executor_runs_in_place() {
        let plan = LaunchPlan::build(
            "local-0000",
            "slave-1",
            "/opt/test_executor",
            Path::new("/tmp/offergrid"),
            &params(&[("cpus", "1")]),
        )
        .unwrap();

        assert_eq!(plan.work_dir, PathBuf::from("/tmp/offergrid/local-0000/slave-1"));
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.command(), Some(Path::new("/opt/test_executor")));
        assert_eq!(plan.env.get("OFFERGRID_SLAVE_ID").map(String::as_str), Some("slave-1"));
        assert!(!plan.env.contains_key("cpus"));
    }

    #[test]
    fn env_params_are_exported() {
        let plan = LaunchPlan::build(
            "fw",
            "s",
            "/bin/exec",
            Path::new("/w"),
            &params(&[("env.JAVA_HOME", "/usr/lib/jvm"), ("env.", "ignored"), ("mem", "32")]),
        )
        .unwrap();

        assert_eq!(plan.env.get("JAVA_HOME").map(String::as_str), Some("/usr/lib/jvm"));
        assert!(!plan.env.contains_key(""));
        assert_eq!(plan.env.len(), 4);
    }

    #[test]
    fn hdfs_archive_is_fetched_then_unpacked() {
        let plan = LaunchPlan::build(
            "fw",
            "s",
            "hdfs://namenode/frameworks/exec.tgz",
            Path::new("/w"),
            &HashMap::new(),
        )
        .unwrap();

        assert!(matches!(
            &plan.steps[1],
            LaunchStep::FetchHdfs { local, .. } if local == Path::new("./exec.tgz")
        ));
        assert!(matches!(
            &plan.steps[2],
            LaunchStep::Unpack { archive } if archive == Path::new("./exec.tgz")
        ));
        assert_eq!(plan.command(), Some(Path::new("./executor")));
    }

    #[test]
    fn plan_serializes_for_logging() {
        let plan = LaunchPlan::build("fw", "s", "/bin/exec", Path::new("/w"), &HashMap::new())
            .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["work_dir"], "/w/fw/s");
        assert_eq!(json["env"]["OFFERGRID_FRAMEWORK_ID"], "fw");
    }

    #[test]
    fn illegal_characters_are_rejected() {
        for uri in ["/opt/it's", "C:\\exec", "/opt/nul\0byte"] {
            let err = LaunchPlan::build("fw", "s", uri, Path::new("/w"), &HashMap::new())
                .unwrap_err();
            assert!(matches!(err, LocalError::IllegalExecutorPath(_)));
        }
    }
}
