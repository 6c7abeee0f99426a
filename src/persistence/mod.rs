use crate::repository::TaskRepository;
use crate::task::Task;
use crate::task_validation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Somewhere a whole repository snapshot can be kept between sessions.
pub trait TaskStore {
    fn save_tasks(&self, tasks: &TaskRepository) -> PersistenceResult<()>;
    /// `None` when nothing has been saved yet.
    fn load_tasks(&self) -> PersistenceResult<Option<TaskRepository>>;
}

pub fn validate_tasks<'a, I>(tasks: I) -> PersistenceResult<()>
where
    I: IntoIterator<Item = &'a Task>,
{
    task_validation::validate_task_collection(tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    TaskDocument, load_tasks_json, read_tasks_csv, read_tasks_csv_from_reader, save_tasks_json,
    tasks_from_json_str, tasks_to_json_string,
};
