/// Task endpoints for the authenticated caller
///
/// Every operation here is scoped to the caller's identity: listing shows
/// only the caller's tasks, creation attaches the caller as owner, and
/// update/delete match on `(id, owner)` so another user's task id behaves
/// exactly like a missing one.
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - List own tasks, newest first
/// - `POST   /v1/tasks` - Create a task owned by the caller
/// - `PUT    /v1/tasks/:id` - Partial update of an owned task
/// - `DELETE /v1/tasks/:id` - Delete an owned task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use taskdeck_shared::{
    auth::extract::CurrentUser,
    models::task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title, required and non-empty
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update task request
///
/// A field that is absent leaves the stored value unchanged; a field that
/// is present is applied. `description` accepts an explicit `null` to
/// clear the stored value, which is why it deserializes through
/// [`double_option`]: plain `Option` cannot tell `null` from absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title (must stay non-empty if provided)
    pub title: Option<String>,

    /// New description; `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Deserializes a present field into `Some(inner)`, so that the outer
/// `Option` tracks presence and the inner one tracks `null`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Rejects titles that are empty or whitespace-only once trimmed
pub(crate) fn ensure_title_not_blank(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "title".to_string(),
            message: "Title must not be blank".to_string(),
        }]));
    }
    Ok(())
}

impl UpdateTaskRequest {
    /// Validates the provided fields and converts to the model update
    pub(crate) fn into_update(self) -> Result<UpdateTask, ApiError> {
        if let Some(ref title) = self.title {
            ensure_title_not_blank(title)?;
        }

        Ok(UpdateTask {
            title: self.title,
            description: self.description,
        })
    }
}

/// Lists the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_for_user(&state.db, user.id).await?;

    Ok(Json(tasks))
}

/// Creates a task owned by the caller
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing or blank title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    ensure_title_not_blank(&req.title)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            user_id: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially updates one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: no such task, or the task belongs to someone else
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let update = req.into_update()?;

    let task = Task::update_for_user(&state.db, id, user.id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: no such task, or the task belongs to someone else
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete_for_user(&state.db, id, user.id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Task deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_deserialize_to_unchanged() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();

        assert!(req.title.is_none());
        assert!(req.description.is_none());
    }

    #[test]
    fn test_null_description_means_clear() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();

        assert_eq!(req.description, Some(None));
    }

    #[test]
    fn test_present_description_means_replace() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"description": "new text"}"#).unwrap();

        assert_eq!(req.description, Some(Some("new text".to_string())));
    }

    #[test]
    fn test_blank_title_rejected() {
        let req = UpdateTaskRequest {
            title: Some("   ".to_string()),
            description: None,
        };

        assert!(req.into_update().is_err());
    }

    #[test]
    fn test_absent_title_passes_through() {
        let req = UpdateTaskRequest {
            title: None,
            description: Some(None),
        };

        let update = req.into_update().unwrap();
        assert!(update.title.is_none());
        assert_eq!(update.description, Some(None));
    }

    #[test]
    fn test_create_request_requires_title() {
        let req: Result<CreateTaskRequest, _> =
            serde_json::from_str(r#"{"description": "no title"}"#);
        assert!(req.is_err());

        let req: CreateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
