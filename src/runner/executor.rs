use crate::error::ExecutionError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use super::{GroupKind, GroupResult, GroupStatus, GroupWork};

/// Seam to the external plan command. Each call captures the full stdout of
/// one invocation; a non-zero exit is an error, never partial output.
#[async_trait]
pub trait PlanExecutor: Send + Sync {
    /// One invocation planning every target of the group implicitly.
    async fn plan_all(&self, kind: GroupKind, module: &str) -> Result<Vec<u8>, ExecutionError>;

    /// One invocation planning a single target working directory.
    async fn plan_target(&self, target: &str) -> Result<Vec<u8>, ExecutionError>;
}

/// Runs plans through the kitman CLI.
pub struct KitmanExecutor {
    pub binary: PathBuf,
}

impl KitmanExecutor {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, ExecutionError> {
        // Plain command names go through PATH lookup
        let binary_str = self.binary.to_string_lossy();
        let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
            Command::new(&self.binary)
        } else {
            Command::new(binary_str.as_ref())
        };
        cmd.args(args);

        debug!("running {} {}", binary_str, args.join(" "));
        let output = cmd.output().await.map_err(ExecutionError::Io)?;

        if !output.status.success() {
            return Err(ExecutionError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl PlanExecutor for KitmanExecutor {
    async fn plan_all(&self, kind: GroupKind, module: &str) -> Result<Vec<u8>, ExecutionError> {
        let mut args = vec!["tg", "plan_all", "-m", module];
        args.extend_from_slice(kind.batch_selector_args());
        args.extend_from_slice(&["--local", "--pr"]);
        self.run(&args).await
    }

    async fn plan_target(&self, target: &str) -> Result<Vec<u8>, ExecutionError> {
        self.run(&["tg", "plan", "--wd", target, "--local", "--pr"])
            .await
    }
}

/// Execute one group's work, capturing combined output and flushing it to
/// the group's artifact file before returning. Targeted invocations run
/// strictly sequentially in input order; the first failure abandons the
/// remaining targets but the buffer captured so far is still written.
pub async fn run_group(
    executor: &dyn PlanExecutor,
    kind: GroupKind,
    module: &str,
    work: &GroupWork,
    artifact: &Path,
) -> GroupResult {
    let start = std::time::Instant::now();

    let (buffer, outcome) = match work {
        GroupWork::Batch => match executor.plan_all(kind, module).await {
            Ok(output) => (output, Ok(GroupStatus::Completed)),
            Err(e) => (Vec::new(), Err(e)),
        },
        GroupWork::Targets(targets) if targets.is_empty() => {
            let sentinel = format!("{}\n", kind.no_work_message()).into_bytes();
            (sentinel, Ok(GroupStatus::NoWork))
        }
        GroupWork::Targets(targets) => run_targets(executor, targets).await,
    };

    let status = match write_artifact(artifact, &buffer) {
        Err(e) => GroupStatus::Failed {
            error: e.to_string(),
        },
        Ok(()) => match outcome {
            Ok(status) => status,
            Err(e) => GroupStatus::Failed {
                error: e.to_string(),
            },
        },
    };

    GroupResult {
        kind,
        status,
        artifact: artifact.to_path_buf(),
        bytes_captured: buffer.len(),
        duration: start.elapsed(),
    }
}

async fn run_targets(
    executor: &dyn PlanExecutor,
    targets: &[String],
) -> (Vec<u8>, Result<GroupStatus, ExecutionError>) {
    let mut buffer = Vec::new();

    for target in targets {
        debug!("planning {}", target);
        match executor.plan_target(target).await {
            Ok(output) => {
                buffer.extend_from_slice(&output);
                // Blank line between per-target plan outputs
                buffer.push(b'\n');
            }
            Err(e) => {
                let err = ExecutionError::PlanFailed {
                    target: target.clone(),
                    source: Box::new(e),
                };
                return (buffer, Err(err));
            }
        }
    }

    (buffer, Ok(GroupStatus::Completed))
}

fn write_artifact(path: &Path, buffer: &[u8]) -> Result<(), ExecutionError> {
    std::fs::write(path, buffer).map_err(|e| ExecutionError::WriteArtifact {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fake executor recording invocations; fails for targets listed in
    /// `fail_on`.
    struct FakeExecutor {
        fail_on: Vec<String>,
        calls: AtomicUsize,
        planned: Mutex<Vec<String>>,
    }

    impl FakeExecutor {
        fn new(fail_on: &[&str]) -> Self {
            Self {
                fail_on: fail_on.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
                planned: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlanExecutor for FakeExecutor {
        async fn plan_all(&self, kind: GroupKind, module: &str) -> Result<Vec<u8>, ExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.iter().any(|f| f == "plan_all") {
                return Err(ExecutionError::NonZeroExit {
                    code: 1,
                    stderr: "boom".to_string(),
                });
            }
            Ok(format!("plan_all {} {}\n", kind, module).into_bytes())
        }

        async fn plan_target(&self, target: &str) -> Result<Vec<u8>, ExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.planned.lock().unwrap().push(target.to_string());
            if self.fail_on.iter().any(|f| f == target) {
                return Err(ExecutionError::NonZeroExit {
                    code: 1,
                    stderr: "boom".to_string(),
                });
            }
            Ok(format!("plan for {}\n", target).into_bytes())
        }
    }

    fn targets(ids: &[&str]) -> GroupWork {
        GroupWork::Targets(ids.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_targeted_concatenates_in_order_with_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("commercial-plans.txt");
        let executor = FakeExecutor::new(&[]);

        let result = run_group(
            &executor,
            GroupKind::Commercial,
            "s3_buckets",
            &targets(&["a", "b"]),
            &artifact,
        )
        .await;

        assert_eq!(result.status, GroupStatus::Completed);
        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content, "plan for a\n\nplan for b\n\n");
        assert_eq!(*executor.planned.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_targeted_fails_fast_and_keeps_partial_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("commercial-plans.txt");
        let executor = FakeExecutor::new(&["b"]);

        let result = run_group(
            &executor,
            GroupKind::Commercial,
            "s3_buckets",
            &targets(&["a", "b", "c"]),
            &artifact,
        )
        .await;

        match &result.status {
            GroupStatus::Failed { error } => assert!(error.contains("plan for b failed")),
            other => panic!("expected failure, got {:?}", other),
        }
        // c was never started
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
        // partial buffer is still durable
        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content, "plan for a\n\n");
    }

    #[tokio::test]
    async fn test_empty_target_list_writes_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("govcloud-plans.txt");
        let executor = FakeExecutor::new(&[]);

        let result = run_group(
            &executor,
            GroupKind::Govcloud,
            "s3_buckets",
            &targets(&[]),
            &artifact,
        )
        .await;

        assert_eq!(result.status, GroupStatus::NoWork);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content, "No GovCloud plans needed\n");
    }

    #[tokio::test]
    async fn test_batch_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("commercial-plans.txt");
        let executor = FakeExecutor::new(&[]);

        let result = run_group(
            &executor,
            GroupKind::Commercial,
            "s3_buckets",
            &GroupWork::Batch,
            &artifact,
        )
        .await;

        assert_eq!(result.status, GroupStatus::Completed);
        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content, "plan_all commercial s3_buckets\n");
        assert_eq!(result.bytes_captured, content.len());
    }
}
