//! SQL storage for task rows.
//!
//! Every query here is id- or owner-scoped but never both at once: handlers
//! load by id first and compare the owner second, so the two failure modes
//! stay distinguishable.

use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{TaskPriority, TaskResponse, TaskStatus};

const TASK_COLUMNS: &str = r#"id, title, description, priority, status, due_date, user_id,
        to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
        to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at"#;

/// A task row as stored, including the owner id handlers compare against.
#[derive(Debug)]
pub(super) struct TaskRow {
    pub(super) id: Uuid,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: TaskPriority,
    pub(super) status: TaskStatus,
    pub(super) due_date: Option<NaiveDate>,
    pub(super) user_id: Uuid,
    pub(super) created_at: String,
    pub(super) updated_at: String,
}

impl TaskRow {
    /// Converts the row into the wire shape.
    pub(super) fn into_response(self) -> TaskResponse {
        TaskResponse {
            id: self.id.to_string(),
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            due_date: self.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
            user: self.user_id.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let priority: String = row.get("priority");
        let priority = TaskPriority::from_db(&priority).ok_or_else(|| {
            sqlx::Error::Decode(format!("unexpected priority value: {priority}").into())
        })?;
        let status: String = row.get("status");
        let status = TaskStatus::from_db(&status).ok_or_else(|| {
            sqlx::Error::Decode(format!("unexpected status value: {status}").into())
        })?;

        Ok(Self {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            priority,
            status,
            due_date: row.get("due_date"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

/// Validated fields bound on insert and update.
#[derive(Debug)]
pub(super) struct TaskWrite {
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: TaskPriority,
    pub(super) status: TaskStatus,
    pub(super) due_date: Option<NaiveDate>,
}

/// Fetch every task owned by `user_id`, newest first.
pub(super) async fn fetch_tasks_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TaskRow>, sqlx::Error> {
    let query = format!(
        r"
        SELECT {TASK_COLUMNS}
        FROM tasks
        WHERE user_id = $1
        ORDER BY created_at DESC
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    rows.iter().map(TaskRow::from_row).collect()
}

/// Fetch a single task by id, regardless of owner.
pub(super) async fn fetch_task(pool: &PgPool, task_id: Uuid) -> Result<Option<TaskRow>, sqlx::Error> {
    let query = format!(
        r"
        SELECT {TASK_COLUMNS}
        FROM tasks
        WHERE id = $1
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(task_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    row.as_ref().map(TaskRow::from_row).transpose()
}

/// Insert a task owned by `user_id` and return the stored row.
pub(super) async fn insert_task(
    pool: &PgPool,
    user_id: Uuid,
    write: &TaskWrite,
) -> Result<TaskRow, sqlx::Error> {
    let query = format!(
        r"
        INSERT INTO tasks (title, description, priority, status, due_date, user_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {TASK_COLUMNS}
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(&write.title)
        .bind(write.description.as_deref())
        .bind(write.priority.as_str())
        .bind(write.status.as_str())
        .bind(write.due_date)
        .bind(user_id)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    TaskRow::from_row(&row)
}

/// Replace the mutable fields of a task; id and owner are never touched.
pub(super) async fn update_task_row(
    pool: &PgPool,
    task_id: Uuid,
    write: &TaskWrite,
) -> Result<TaskRow, sqlx::Error> {
    let query = format!(
        r"
        UPDATE tasks
        SET title = $1, description = $2, priority = $3, status = $4,
            due_date = $5, updated_at = NOW()
        WHERE id = $6
        RETURNING {TASK_COLUMNS}
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(&write.title)
        .bind(write.description.as_deref())
        .bind(write.priority.as_str())
        .bind(write.status.as_str())
        .bind(write.due_date)
        .bind(task_id)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    TaskRow::from_row(&row)
}

/// Remove a task permanently.
pub(super) async fn delete_task_row(pool: &PgPool, task_id: Uuid) -> Result<(), sqlx::Error> {
    let query = "DELETE FROM tasks WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(task_id)
        .execute(pool)
        .instrument(span)
        .await?;

    Ok(())
}
