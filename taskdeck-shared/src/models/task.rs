/// Task model and database operations
///
/// Tasks belong to exactly one user, fixed at creation time from the
/// authenticated caller. Owners operate on their own tasks through the
/// `*_for_user` variants; administrators reach any task through the
/// unscoped ones.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     user_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model representing a single personal task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title, always non-empty
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user, immutable after creation
    pub user_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (non-empty, validated at the API boundary)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user (the authenticated caller)
    pub user_id: Uuid,
}

/// Input for updating an existing task
///
/// `title` is either absent (unchanged) or a replacement value.
/// `description` distinguishes three states: absent (unchanged),
/// `Some(None)` (clear to NULL), and `Some(Some(text))` (replace).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description, with `Some(None)` clearing the stored value
    pub description: Option<Option<String>>,
}

/// Owner identity attached to admin task listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOwner {
    /// Owning user ID
    pub id: Uuid,

    /// Owner display name
    pub name: String,

    /// Owner email
    pub email: String,
}

/// Task joined with its owner's public identity
///
/// Used by the admin listings, which expand the owning-user reference
/// to name and email. Never carries the owner's password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithOwner {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Expanded owner identity
    pub owner: TaskOwner,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Flat join row; reshaped into [`TaskWithOwner`] after fetching.
#[derive(Debug, sqlx::FromRow)]
struct TaskWithOwnerRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    user_id: Uuid,
    owner_name: String,
    owner_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskWithOwnerRow> for TaskWithOwner {
    fn from(row: TaskWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            owner: TaskOwner {
                id: row.user_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TASK_COLUMNS: &str = "id, title, description, user_id, created_at, updated_at";

const TASK_OWNER_SELECT: &str = r#"
    SELECT t.id, t.title, t.description, t.user_id,
           u.name AS owner_name, u.email AS owner_email,
           t.created_at, t.updated_at
    FROM tasks t
    JOIN users u ON u.id = t.user_id
"#;

impl Task {
    /// Creates a new task owned by `data.user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the owning user does not exist (foreign key
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, user_id) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, regardless of owner
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, but only if `user_id` owns it
    ///
    /// Returns `None` both for a missing task and for someone else's task,
    /// so callers cannot probe for the existence of other users' tasks.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists one user's tasks, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists every task with its owner expanded, newest first
    pub async fn list_all_with_owner(pool: &PgPool) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskWithOwnerRow>(&format!(
            "{} ORDER BY t.created_at DESC",
            TASK_OWNER_SELECT
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists one user's tasks with the owner expanded, newest first
    pub async fn list_for_user_with_owner(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskWithOwnerRow>(&format!(
            "{} WHERE t.user_id = $1 ORDER BY t.created_at DESC",
            TASK_OWNER_SELECT
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Updates a task regardless of owner (admin path)
    ///
    /// Only `Some` fields are written; `description: Some(None)` clears
    /// the column. Returns `None` if the task doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::update_scoped(pool, id, None, data).await
    }

    /// Updates a task only if `user_id` owns it (owner path)
    pub async fn update_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        Self::update_scoped(pool, id, Some(user_id), data).await
    }

    async fn update_scoped(
        pool: &PgPool,
        id: Uuid,
        user_id: Option<Uuid>,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1");
        if user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND user_id = ${}", bind_count));
        }
        query.push_str(&format!(" RETURNING {}", TASK_COLUMNS));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(user_id) = user_id {
            q = q.bind(user_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task regardless of owner (admin path)
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task only if `user_id` owns it (owner path)
    pub async fn delete_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> TaskWithOwnerRow {
        TaskWithOwnerRow {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            user_id: Uuid::new_v4(),
            owner_name: "A".to_string(),
            owner_email: "a@x.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_expansion_shape() {
        let row = sample_row();
        let user_id = row.user_id;
        let with_owner: TaskWithOwner = row.into();

        assert_eq!(with_owner.owner.id, user_id);
        assert_eq!(with_owner.owner.name, "A");
        assert_eq!(with_owner.owner.email, "a@x.com");

        // Owner carries only id/name/email; no hash can leak through here
        let json = serde_json::to_value(&with_owner).expect("Should serialize");
        assert_eq!(
            json["owner"]
                .as_object()
                .expect("owner should be an object")
                .len(),
            3
        );
    }

    #[test]
    fn test_update_task_clear_description() {
        let update = UpdateTask {
            title: None,
            description: Some(None),
        };

        // Absent title stays unchanged, present-but-null description clears
        assert!(update.title.is_none());
        assert_eq!(update.description, Some(None));
    }
}
