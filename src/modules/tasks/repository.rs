use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{OptionalExtension, Params, Row, params};

use super::schema::UpdateTaskDto;
use crate::db::{Database, DbError, Store};
use crate::models::{NewTask, Task};

const COLUMNS: &str = "id, title, completed, created_at";

/// Newest first. `rowid` breaks ties between rows created in the same tick.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

pub async fn find_all(store: &Store) -> Result<Vec<Task>, DbError> {
    store
        .call(|db| {
            query_tasks(
                db,
                &format!("SELECT {COLUMNS} FROM tasks {NEWEST_FIRST}"),
                [],
            )
        })
        .await
}

pub async fn find_by_id(store: &Store, id: &str) -> Result<Option<Task>, DbError> {
    let id = id.to_string();
    store
        .call(move |db| {
            let task = db
                .conn()
                .query_row(
                    &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                    params![id],
                    row_to_task,
                )
                .optional()?;
            Ok(task)
        })
        .await
}

/// Insert a task, generating its id and creation timestamp.
pub async fn create(store: &Store, data: NewTask) -> Result<Task, DbError> {
    let task = Task {
        id: uuid::Uuid::new_v4().to_string(),
        title: data.title,
        completed: data.completed,
        // Stored at microsecond precision; truncate so the returned value matches later reads.
        created_at: Utc::now().trunc_subsecs(6),
    };
    store
        .call(move |db| {
            db.conn().execute(
                "INSERT INTO tasks (id, title, completed, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    task.id,
                    task.title,
                    task.completed,
                    format_timestamp(&task.created_at),
                ],
            )?;
            Ok(task)
        })
        .await
}

/// Apply a partial update. Returns `None` when no task has this id.
pub async fn update(
    store: &Store,
    id: &str,
    changes: UpdateTaskDto,
) -> Result<Option<Task>, DbError> {
    if changes.is_empty() {
        return find_by_id(store, id).await;
    }

    let id = id.to_string();
    store
        .call(move |db| {
            let mut sets = Vec::new();
            let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

            if let Some(title) = changes.title {
                param_values.push(Box::new(title));
                sets.push(format!("title = ?{}", param_values.len()));
            }
            if let Some(completed) = changes.completed {
                param_values.push(Box::new(completed));
                sets.push(format!("completed = ?{}", param_values.len()));
            }
            param_values.push(Box::new(id));

            let sql = format!(
                "UPDATE tasks SET {} WHERE id = ?{} RETURNING {COLUMNS}",
                sets.join(", "),
                param_values.len()
            );
            let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

            // No matching row surfaces as QueryReturnedNoRows, which `optional` turns into None.
            let task = db
                .conn()
                .query_row(&sql, params_ref.as_slice(), row_to_task)
                .optional()?;
            Ok(task)
        })
        .await
}

/// Returns `false` when no task has this id.
pub async fn delete_by_id(store: &Store, id: &str) -> Result<bool, DbError> {
    let id = id.to_string();
    store
        .call(move |db| {
            let removed = db
                .conn()
                .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
}

pub async fn count(store: &Store) -> Result<u64, DbError> {
    store
        .call(|db| {
            let n: i64 = db
                .conn()
                .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or_default())
        })
        .await
}

pub async fn count_by_status(store: &Store, completed: bool) -> Result<u64, DbError> {
    store
        .call(move |db| {
            let n: i64 = db.conn().query_row(
                "SELECT COUNT(*) FROM tasks WHERE completed = ?1",
                params![completed],
                |row| row.get(0),
            )?;
            Ok(u64::try_from(n).unwrap_or_default())
        })
        .await
}

pub async fn find_by_status(store: &Store, completed: bool) -> Result<Vec<Task>, DbError> {
    store
        .call(move |db| {
            query_tasks(
                db,
                &format!("SELECT {COLUMNS} FROM tasks WHERE completed = ?1 {NEWEST_FIRST}"),
                params![completed],
            )
        })
        .await
}

fn query_tasks<P: Params>(db: &Database, sql: &str, params: P) -> Result<Vec<Task>, DbError> {
    let mut stmt = db.conn().prepare(sql)?;
    let tasks = stmt
        .query_map(params, row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let created_str: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        created_at,
    })
}
