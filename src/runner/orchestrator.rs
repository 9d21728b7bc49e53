use crate::config::Settings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::executor::{run_group, PlanExecutor};
use super::{GroupKind, GroupResult, GroupStatus, GroupWork};

/// What each account class has to execute this run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub commercial: GroupWork,
    pub govcloud: GroupWork,
}

impl RunPlan {
    pub fn batch() -> Self {
        Self {
            commercial: GroupWork::Batch,
            govcloud: GroupWork::Batch,
        }
    }

    pub fn targeted(commercial: Vec<String>, govcloud: Vec<String>) -> Self {
        Self {
            commercial: GroupWork::Targets(commercial),
            govcloud: GroupWork::Targets(govcloud),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub groups: Vec<GroupResult>,
    pub total_duration: Duration,
}

impl RunReport {
    /// Every failed group with its cause, in group order.
    pub fn failures(&self) -> Vec<(GroupKind, String)> {
        self.groups
            .iter()
            .filter_map(|g| match &g.status {
                GroupStatus::Failed { error } => Some((g.kind, error.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn all_failed(&self) -> bool {
        self.failures().len() == self.groups.len()
    }
}

pub struct Orchestrator {
    settings: Settings,
    executor: Arc<dyn PlanExecutor>,
}

impl Orchestrator {
    pub fn new(settings: Settings, executor: Arc<dyn PlanExecutor>) -> Self {
        Self { settings, executor }
    }

    /// Run both account classes concurrently and wait for both to finish.
    /// A failing group never cancels its sibling; each outcome is collected
    /// independently.
    pub async fn run(&self, plan: RunPlan) -> RunReport {
        let start = std::time::Instant::now();

        let commercial = self.spawn_group(GroupKind::Commercial, plan.commercial);
        let govcloud = self.spawn_group(GroupKind::Govcloud, plan.govcloud);

        let (commercial, govcloud) = tokio::join!(commercial, govcloud);

        let groups = vec![
            Self::join_result(GroupKind::Commercial, commercial, &self.settings),
            Self::join_result(GroupKind::Govcloud, govcloud, &self.settings),
        ];

        for group in &groups {
            match &group.status {
                GroupStatus::Failed { error } => {
                    warn!("{} plans failed: {}", group.kind, error)
                }
                status => info!(
                    "{} plans {} ({} bytes, {:.1}s) -> {:?}",
                    group.kind,
                    status,
                    group.bytes_captured,
                    group.duration.as_secs_f64(),
                    group.artifact
                ),
            }
        }

        RunReport {
            groups,
            total_duration: start.elapsed(),
        }
    }

    fn spawn_group(
        &self,
        kind: GroupKind,
        work: GroupWork,
    ) -> tokio::task::JoinHandle<GroupResult> {
        let executor = Arc::clone(&self.executor);
        let module = self.settings.module.clone();
        let artifact = self.settings.output_dir.join(kind.artifact_name());

        tokio::spawn(async move { run_group(executor.as_ref(), kind, &module, &work, &artifact).await })
    }

    fn join_result(
        kind: GroupKind,
        joined: Result<GroupResult, tokio::task::JoinError>,
        settings: &Settings,
    ) -> GroupResult {
        match joined {
            Ok(result) => result,
            Err(e) => GroupResult {
                kind,
                status: GroupStatus::Failed {
                    error: format!("task panicked: {}", e),
                },
                artifact: settings.output_dir.join(kind.artifact_name()),
                bytes_captured: 0,
                duration: Duration::ZERO,
            },
        }
    }
}
