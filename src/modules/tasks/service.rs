use super::repository;
use super::schema::{CreateTaskDto, UpdateTaskDto};
use crate::db::{DbError, Store};
use crate::models::{NewTask, Task, TaskStats};

pub async fn get_all_tasks(store: &Store) -> Result<Vec<Task>, DbError> {
    repository::find_all(store).await
}

pub async fn get_task_by_id(store: &Store, id: &str) -> Result<Option<Task>, DbError> {
    repository::find_by_id(store, id).await
}

/// Create a task; `completed` defaults to `false`.
pub async fn create_task(store: &Store, data: CreateTaskDto) -> Result<Task, DbError> {
    let new_task = NewTask {
        title: data.title,
        completed: data.completed.unwrap_or(false),
    };
    repository::create(store, new_task).await
}

pub async fn update_task(
    store: &Store,
    id: &str,
    data: UpdateTaskDto,
) -> Result<Option<Task>, DbError> {
    repository::update(store, id, data).await
}

pub async fn delete_task(store: &Store, id: &str) -> Result<bool, DbError> {
    repository::delete_by_id(store, id).await
}

pub async fn get_task_stats(store: &Store) -> Result<TaskStats, DbError> {
    let total = repository::count(store).await?;
    let completed = repository::count_by_status(store, true).await?;
    Ok(TaskStats::new(total, completed))
}
