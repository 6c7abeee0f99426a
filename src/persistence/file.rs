use super::{PersistenceResult, validate_tasks};
use crate::repository::TaskRepository;
use crate::task::{Task, TaskId};
use crate::task_validation;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Structured task description: `{"tasks": [{"id", "title", "duration", "prerequisites"}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub tasks: Vec<Task>,
}

impl TaskDocument {
    pub fn from_repository(tasks: &TaskRepository) -> Self {
        Self {
            tasks: tasks.iter().cloned().collect(),
        }
    }

    /// Later entries with a repeated id replace earlier ones.
    pub fn into_repository(self) -> PersistenceResult<TaskRepository> {
        validate_tasks(&self.tasks)?;
        let mut repository = TaskRepository::new();
        for task in self.tasks {
            let task_id = task.id;
            if repository.insert(task).is_some() {
                warn!(task_id, "duplicate task id in document, keeping the later entry");
            }
        }
        Ok(repository)
    }
}

pub fn tasks_to_json_string(tasks: &TaskRepository) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(&TaskDocument::from_repository(
        tasks,
    ))?)
}

pub fn tasks_from_json_str(input: &str) -> PersistenceResult<TaskRepository> {
    let document: TaskDocument = serde_json::from_str(input)?;
    document.into_repository()
}

pub fn save_tasks_json<P: AsRef<Path>>(tasks: &TaskRepository, path: P) -> PersistenceResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &TaskDocument::from_repository(tasks))?;
    info!(path = %path.display(), tasks = tasks.len(), "saved tasks to json");
    Ok(())
}

pub fn load_tasks_json<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskRepository> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let document: TaskDocument = serde_json::from_reader(file)?;
    let tasks = document.into_repository()?;
    info!(path = %path.display(), tasks = tasks.len(), "loaded tasks from json");
    Ok(tasks)
}

/// Reads the tabular format: `id, title, duration[, prerequisites]`, no header,
/// prerequisites space-separated. Rows that do not parse are skipped.
pub fn read_tasks_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskRepository> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let tasks = read_tasks_csv_from_reader(file)?;
    info!(path = %path.display(), tasks = tasks.len(), "loaded tasks from csv");
    Ok(tasks)
}

pub fn read_tasks_csv_from_reader<R: Read>(reader: R) -> PersistenceResult<TaskRepository> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut repository = TaskRepository::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row, %err, "skipping unreadable csv row");
                continue;
            }
        };
        match task_from_record(&record) {
            Ok(task) => {
                repository.insert(task);
            }
            Err(reason) => warn!(row, reason, "skipping csv row"),
        }
    }
    Ok(repository)
}

fn task_from_record(record: &StringRecord) -> Result<Task, &'static str> {
    if record.len() < 3 {
        return Err("fewer than 3 columns");
    }

    let id = record[0]
        .trim()
        .parse::<TaskId>()
        .map_err(|_| "id is not an integer")?;
    let duration = record[2]
        .trim()
        .parse::<f64>()
        .map_err(|_| "duration is not a number")?;
    let prerequisites = match record.get(3) {
        Some(field) => field
            .split_whitespace()
            .map(str::parse::<TaskId>)
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|_| "prerequisite is not an integer")?,
        None => BTreeSet::new(),
    };

    let task = Task {
        id,
        title: record[1].to_string(),
        duration,
        prerequisites,
    };
    task_validation::validate_task(&task).map_err(|_| "duration is negative or not finite")?;
    Ok(task)
}
