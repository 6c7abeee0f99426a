use crate::task::{Task, TaskId};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use std::collections::BTreeMap;

/// In-memory mapping from task id to task record.
///
/// A repository is a plain value: loaders build a fresh one and callers
/// replace their current snapshot wholesale. Scheduling only ever reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRepository {
    tasks: BTreeMap<TaskId, Task>,
}

impl TaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `task`, returning the record it displaced when the id was taken.
    pub fn insert(&mut self, task: Task) -> Option<Task> {
        self.tasks.insert(task.id, task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.keys().copied()
    }

    /// Returns a copy without task `id`, with every reference to it dropped
    /// from the remaining tasks' prerequisites.
    pub fn without_task(&self, id: TaskId) -> Self {
        let tasks = self
            .tasks
            .values()
            .filter(|task| task.id != id)
            .map(|task| {
                let mut task = task.clone();
                task.prerequisites.remove(&id);
                (task.id, task)
            })
            .collect();
        Self { tasks }
    }

    /// `(task, prerequisite)` pairs whose prerequisite is not in the repository,
    /// ordered by task id then prerequisite id.
    pub fn unknown_prerequisites(&self) -> Vec<(TaskId, TaskId)> {
        self.tasks
            .values()
            .flat_map(|task| {
                task.prerequisites
                    .iter()
                    .filter(|pred| !self.tasks.contains_key(pred))
                    .map(move |pred| (task.id, *pred))
            })
            .collect()
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<i32> = self.tasks.keys().copied().collect();
        let titles: Vec<&str> = self.tasks.values().map(|t| t.title.as_str()).collect();
        let durations: Vec<f64> = self.tasks.values().map(|t| t.duration).collect();

        let prerequisites = if self.tasks.is_empty() {
            Series::new_empty(
                PlSmallStr::from_static("prerequisites"),
                &DataType::List(Box::new(DataType::Int32)),
            )
        } else {
            let lists: Vec<Series> = self
                .tasks
                .values()
                .map(|t| {
                    let values: Vec<i32> = t.prerequisites.iter().copied().collect();
                    Series::new(PlSmallStr::from_static(""), values)
                })
                .collect();
            Series::new(PlSmallStr::from_static("prerequisites"), lists)
        };

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("title"), titles).into_column(),
            Series::new(PlSmallStr::from_static("duration"), durations).into_column(),
            prerequisites.into_column(),
        ])
    }

    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let mut repository = Self::new();
        if df.height() == 0 {
            return Ok(repository);
        }
        for row_idx in 0..df.height() {
            repository.insert(Self::task_from_row(df, row_idx)?);
        }
        Ok(repository)
    }

    fn task_from_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Task> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing id".into()))?;

        let title = df
            .column("title")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let duration = df.column("duration")?.f64()?.get(row_idx).unwrap_or(0.0);

        let prerequisites = match df.column("prerequisites")?.list()?.get_as_series(row_idx) {
            Some(series) => series.i32()?.into_iter().flatten().collect(),
            None => Default::default(),
        };

        Ok(Task {
            id,
            title,
            duration,
            prerequisites,
        })
    }
}

impl FromIterator<Task> for TaskRepository {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut repository = Self::new();
        for task in iter {
            repository.insert(task);
        }
        repository
    }
}

impl<'a> IntoIterator for &'a TaskRepository {
    type Item = &'a Task;
    type IntoIter = std::collections::btree_map::Values<'a, TaskId, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.values()
    }
}
