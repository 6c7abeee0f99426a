use super::{PersistenceResult, TaskStore};
use crate::repository::TaskRepository;
use crate::task::Task;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;
use tracing::info;

/// Keeps a single repository snapshot; every save replaces the previous one.
pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS task_snapshot (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                task_count INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                task_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TaskStore for SqliteTaskStore {
    fn save_tasks(&self, tasks: &TaskRepository) -> PersistenceResult<()> {
        super::validate_tasks(tasks)?;
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO tasks (id, task_json) VALUES (?1, ?2)")?;
            for task in tasks.iter() {
                let json = serde_json::to_string(task)?;
                stmt.execute(params![task.id, json])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO task_snapshot (id, task_count) VALUES (1, ?1)",
            params![tasks.len() as i64],
        )?;
        tx.commit()?;
        info!(tasks = tasks.len(), "saved task snapshot to sqlite");
        Ok(())
    }

    fn load_tasks(&self) -> PersistenceResult<Option<TaskRepository>> {
        let conn = self.lock();

        let saved: Option<i64> = conn
            .query_row("SELECT task_count FROM task_snapshot WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if saved.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tasks = Vec::new();
        for json in rows {
            let task: Task = serde_json::from_str(&json?)?;
            tasks.push(task);
        }
        super::validate_tasks(&tasks)?;

        Ok(Some(tasks.into_iter().collect()))
    }
}
