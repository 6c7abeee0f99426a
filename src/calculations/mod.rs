pub mod backward_pass;
pub mod forward_pass;

use crate::task::TaskId;
use crate::task_validation::TaskValidationError;
use thiserror::Error;

pub use backward_pass::{BackwardPass, CriticalPathAnalysis, TaskFloat};
pub use forward_pass::ForwardPass;

/// Why a scheduling run produced no schedule. Every variant is terminal for
/// the run: no partial start times are ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("circular dependency detected among tasks {}", join_ids(.cycle))]
    CyclicDependency {
        /// Tasks lying on a cycle.
        cycle: Vec<TaskId>,
        /// Every task left unresolved: the cycle plus everything downstream of it.
        unresolved: Vec<TaskId>,
    },
    #[error("task {task} references unknown prerequisite {prerequisite}")]
    UnknownPrerequisite { task: TaskId, prerequisite: TaskId },
    #[error("task {task} has invalid duration {duration} (must be a finite, non-negative number of days)")]
    InvalidDuration { task: TaskId, duration: f64 },
    #[error("schedule has no start time for task {task}")]
    MissingStart { task: TaskId },
    #[error("plan spans {total_days} days, more than the chart's {max_weeks} weeks")]
    TimelineTooLong { total_days: f64, max_weeks: u32 },
}

impl ScheduleError {
    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::CyclicDependency { .. } => "cyclic_dependency",
            ScheduleError::UnknownPrerequisite { .. } => "unknown_prerequisite",
            ScheduleError::InvalidDuration { .. } => "invalid_duration",
            ScheduleError::MissingStart { .. } => "missing_start",
            ScheduleError::TimelineTooLong { .. } => "timeline_too_long",
        }
    }
}

impl From<TaskValidationError> for ScheduleError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::InvalidDuration { task, duration } => {
                ScheduleError::InvalidDuration { task, duration }
            }
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

fn join_ids(ids: &[TaskId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
