pub mod calculations;
pub mod chart;
pub mod config;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod repository;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use calculations::{CriticalPathAnalysis, ScheduleError, ScheduleResult, TaskFloat};
pub use chart::{Chart, ChartOptions, Primitive};
pub use config::PlannerConfig;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteTaskStore;
pub use persistence::{
    PersistenceError, TaskDocument, TaskStore, load_tasks_json, read_tasks_csv, save_tasks_json,
};
pub use repository::TaskRepository;
pub use schedule::{Schedule, ScheduleSummary};
pub use task::{Task, TaskId};
pub use task_validation::TaskValidationError;
