use std::path::PathBuf;
use std::time::Duration;

/// Substring that marks a target as belonging to the GovCloud account class.
const GOVCLOUD_MARKER: &str = "govcloud";

/// The two account classes plans are executed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Commercial,
    Govcloud,
}

impl GroupKind {
    pub const ALL: [GroupKind; 2] = [GroupKind::Commercial, GroupKind::Govcloud];

    /// Raw plan artifact written into the output directory for this group.
    pub fn artifact_name(&self) -> &'static str {
        match self {
            GroupKind::Commercial => "commercial-plans.txt",
            GroupKind::Govcloud => "govcloud-plans.txt",
        }
    }

    /// Placeholder written when a targeted run has no work for this group.
    /// The report pass recognizes and skips artifacts carrying it.
    pub fn no_work_message(&self) -> &'static str {
        match self {
            GroupKind::Commercial => "No commercial plans needed",
            GroupKind::Govcloud => "No GovCloud plans needed",
        }
    }

    /// Extra arguments selecting this account class in batch mode.
    pub fn batch_selector_args(&self) -> &'static [&'static str] {
        match self {
            GroupKind::Commercial => &[],
            GroupKind::Govcloud => &[
                "--organizations",
                "govcloud-staging|govcloud-production",
                "--regions",
                "us-gov-west-1",
            ],
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKind::Commercial => write!(f, "commercial"),
            GroupKind::Govcloud => write!(f, "govcloud"),
        }
    }
}

/// Split targets into the two account classes, preserving input order.
/// A target is GovCloud iff its identifier contains the marker substring.
pub fn partition_targets(targets: &[String]) -> (Vec<String>, Vec<String>) {
    let mut commercial = Vec::new();
    let mut govcloud = Vec::new();

    for target in targets {
        if target.contains(GOVCLOUD_MARKER) {
            govcloud.push(target.clone());
        } else {
            commercial.push(target.clone());
        }
    }

    (commercial, govcloud)
}

/// The work one execution group has to do.
#[derive(Debug, Clone)]
pub enum GroupWork {
    /// Single plan_all invocation covering every target in the group.
    Batch,
    /// One plan invocation per target, run sequentially in order.
    Targets(Vec<String>),
}

#[derive(Debug)]
pub struct GroupResult {
    pub kind: GroupKind,
    pub status: GroupStatus,
    pub artifact: PathBuf,
    pub bytes_captured: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupStatus {
    Completed,
    NoWork,
    Failed { error: String },
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupStatus::Completed => write!(f, "completed"),
            GroupStatus::NoWork => write!(f, "no work"),
            GroupStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}
