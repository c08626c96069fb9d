/// Administrator endpoints
///
/// The whole group sits behind the auth guard plus the admin guard, so
/// every handler here can assume an administrator caller. Admin reach is
/// unscoped: any user, any task.
///
/// # Endpoints
///
/// - `GET    /v1/admin/users` - List users (password hash excluded)
/// - `PUT    /v1/admin/user/:id` - Partial user update
/// - `DELETE /v1/admin/user/:id` - Delete user and cascade to their tasks
/// - `GET    /v1/admin/users/:id/tasks` - One user's tasks, newest first
/// - `GET    /v1/admin/tasks` - All tasks with owner expanded
/// - `PUT    /v1/admin/task/:id` - Partial task update
/// - `DELETE /v1/admin/task/:id` - Delete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{tasks::UpdateTaskRequest, MessageResponse},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::password,
    models::{
        task::{Task, TaskWithOwner},
        user::{UpdateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Update user request
///
/// Absent fields leave the stored value unchanged; present fields are
/// applied as-is. In particular `"is_admin": false` demotes the user:
/// presence, not truthiness, decides whether a field is written.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New admin flag
    pub is_admin: Option<bool>,

    /// New password, re-hashed before persisting
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Hashes the password, if provided, and converts to the model update
    fn into_update(self) -> ApiResult<UpdateUser> {
        let password_hash = match self.password {
            Some(ref password) => Some(password::hash_password(password)?),
            None => None,
        };

        Ok(UpdateUser {
            name: self.name,
            email: self.email,
            password_hash,
            is_admin: self.is_admin,
        })
    }
}

/// Lists all users
///
/// The `User` serializer skips the password hash, so the unbounded listing
/// never carries credentials.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list_all(&state.db).await?;

    Ok(Json(users))
}

/// Partially updates any user
///
/// # Errors
///
/// - `404 Not Found`: no user with this id
/// - `409 Conflict`: new email collides with another user
/// - `422 Unprocessable Entity`: validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let update = req.into_update()?;

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user and every task they own
///
/// Both deletes run in one transaction; a failure part-way leaves the
/// database untouched rather than orphaning task rows.
///
/// # Errors
///
/// - `404 Not Found`: no user with this id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let tasks_deleted = User::delete_cascade(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %id, tasks_deleted, "Admin deleted user");

    Ok(Json(MessageResponse::new("User deleted")))
}

/// Lists one user's tasks with the owner expanded, newest first
///
/// A user with no tasks (or an unknown id) yields an empty list.
pub async fn list_user_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithOwner>>> {
    let tasks = Task::list_for_user_with_owner(&state.db, id).await?;

    Ok(Json(tasks))
}

/// Lists every task with its owner expanded, newest first
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithOwner>>> {
    let tasks = Task::list_all_with_owner(&state.db).await?;

    Ok(Json(tasks))
}

/// Partially updates any task
///
/// # Errors
///
/// - `404 Not Found`: no task with this id
/// - `422 Unprocessable Entity`: blank title
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let update = req.into_update()?;

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes any task
///
/// # Errors
///
/// - `404 Not Found`: no task with this id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Task deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_stay_unset() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();

        assert!(req.name.is_none());
        assert!(req.email.is_none());
        assert!(req.is_admin.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_explicit_false_is_preserved() {
        // A demotion must survive the request -> update conversion
        let req: UpdateUserRequest = serde_json::from_str(r#"{"is_admin": false}"#).unwrap();
        assert_eq!(req.is_admin, Some(false));

        let update = req.into_update().unwrap();
        assert_eq!(update.is_admin, Some(false));
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
    }

    #[test]
    fn test_email_only_update_touches_nothing_else() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"email": "new@x.com"}"#).unwrap();
        assert!(req.validate().is_ok());

        let update = req.into_update().unwrap();
        assert_eq!(update.email.as_deref(), Some("new@x.com"));
        assert!(update.name.is_none());
        assert!(update.is_admin.is_none());
        assert!(update.password_hash.is_none());
    }

    #[test]
    fn test_password_is_hashed_not_passed_through() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"password": "new-password-123"}"#).unwrap();

        let update = req.into_update().unwrap();
        let hash = update.password_hash.expect("hash should be set");
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "new-password-123");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "not-an-email"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
