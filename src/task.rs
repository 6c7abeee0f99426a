use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of a task, unique within a [`TaskRepository`](crate::TaskRepository).
pub type TaskId = i32;

/// A unit of work with a duration (in days) and the tasks that must finish first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Zero marks a milestone.
    pub duration: f64,
    #[serde(default)]
    pub prerequisites: BTreeSet<TaskId>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, duration: f64) -> Self {
        Self {
            id,
            title: title.into(),
            duration,
            prerequisites: BTreeSet::new(),
        }
    }

    pub fn with_prerequisites<I>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = TaskId>,
    {
        self.prerequisites = prerequisites.into_iter().collect();
        self
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }

    /// Tooltip text shown for the task's bar on the chart.
    pub fn tooltip(&self) -> String {
        format!("{} ({} days)", self.title, self.duration)
    }
}
