use crate::calculations::{BackwardPass, CriticalPathAnalysis, ForwardPass, ScheduleResult};
use crate::repository::TaskRepository;
use crate::task::TaskId;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub makespan: f64,
    pub critical_path: Vec<TaskId>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("finish={}", self.makespan));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

/// Start time of every task in a repository, in the repository's duration unit.
///
/// A schedule is produced whole by [`Schedule::compute`] and never edited; a
/// changed repository gets a new schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    starts: BTreeMap<TaskId, f64>,
}

impl Schedule {
    pub(crate) fn from_starts(starts: BTreeMap<TaskId, f64>) -> Self {
        Self { starts }
    }

    pub fn compute(tasks: &TaskRepository) -> ScheduleResult<Self> {
        ForwardPass::new(tasks).execute()
    }

    pub fn start_of(&self, task_id: TaskId) -> Option<f64> {
        self.starts.get(&task_id).copied()
    }

    pub fn finish_of(&self, task_id: TaskId, tasks: &TaskRepository) -> Option<f64> {
        let start = self.start_of(task_id)?;
        let task = tasks.get(task_id)?;
        Some(start + task.duration)
    }

    /// `(task id, start)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, f64)> + '_ {
        self.starts.iter().map(|(id, start)| (*id, *start))
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.starts.contains_key(&task_id)
    }

    /// Latest finish over all scheduled tasks, 0 for an empty schedule.
    pub fn makespan(&self, tasks: &TaskRepository) -> f64 {
        self.starts
            .keys()
            .filter_map(|id| self.finish_of(*id, tasks))
            .fold(0.0, f64::max)
    }

    pub fn analyze(&self, tasks: &TaskRepository) -> ScheduleResult<CriticalPathAnalysis> {
        BackwardPass::new(tasks, self).execute()
    }

    pub fn summarize(&self, tasks: &TaskRepository) -> ScheduleResult<ScheduleSummary> {
        let analysis = self.analyze(tasks)?;
        Ok(self.summary_with(&analysis))
    }

    pub fn summary_with(&self, analysis: &CriticalPathAnalysis) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.len(),
            critical_count: analysis.critical_count(),
            makespan: analysis.project_finish,
            critical_path: analysis.critical_path.clone(),
        }
    }

    /// Timeline view ordered by start, then id.
    pub fn to_dataframe(
        &self,
        tasks: &TaskRepository,
        analysis: &CriticalPathAnalysis,
    ) -> PolarsResult<DataFrame> {
        let mut rows: Vec<(TaskId, f64)> = self.iter().collect();
        rows.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut ids = Vec::with_capacity(rows.len());
        let mut titles = Vec::with_capacity(rows.len());
        let mut durations = Vec::with_capacity(rows.len());
        let mut starts = Vec::with_capacity(rows.len());
        let mut finishes = Vec::with_capacity(rows.len());
        let mut floats: Vec<Option<f64>> = Vec::with_capacity(rows.len());
        let mut critical: Vec<Option<bool>> = Vec::with_capacity(rows.len());

        for (task_id, start) in rows {
            let task = tasks.get(task_id).ok_or_else(|| {
                PolarsError::ComputeError(
                    format!("schedule references task {task_id} missing from the repository")
                        .into(),
                )
            })?;
            ids.push(task_id);
            titles.push(task.title.as_str());
            durations.push(task.duration);
            starts.push(start);
            finishes.push(start + task.duration);
            let float = analysis.floats.get(&task_id);
            floats.push(float.map(|f| f.total_float));
            critical.push(float.map(|f| f.is_critical));
        }

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("title"), titles).into_column(),
            Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
            Series::new(PlSmallStr::from_static("start"), starts).into_column(),
            Series::new(PlSmallStr::from_static("finish"), finishes).into_column(),
            Series::new(PlSmallStr::from_static("total_float"), floats).into_column(),
            Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
        ])
    }
}
