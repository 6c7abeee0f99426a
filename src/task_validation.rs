use crate::task::{Task, TaskId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskValidationError {
    #[error("task {task} has invalid duration {duration} (must be a finite, non-negative number of days)")]
    InvalidDuration { task: TaskId, duration: f64 },
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if !task.duration.is_finite() || task.duration < 0.0 {
        return Err(TaskValidationError::InvalidDuration {
            task: task.id,
            duration: task.duration,
        });
    }
    Ok(())
}

pub fn validate_task_collection<'a, I>(tasks: I) -> Result<(), TaskValidationError>
where
    I: IntoIterator<Item = &'a Task>,
{
    for task in tasks {
        validate_task(task)?;
    }
    Ok(())
}
