pub mod executor;
mod group;
mod orchestrator;

pub use executor::{KitmanExecutor, PlanExecutor};
pub use group::{partition_targets, GroupKind, GroupResult, GroupStatus, GroupWork};
pub use orchestrator::{Orchestrator, RunPlan, RunReport};
