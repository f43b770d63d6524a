/// Task endpoints
///
/// All routes sit behind the JWT auth layer and act only on the caller's own
/// tasks. A task id belonging to another user answers exactly like an id that
/// was never issued: `404 Todo not found`.
///
/// - `POST   /todos` - Create
/// - `GET    /todos` - List
/// - `PUT    /todos/:id` - Partial update
/// - `DELETE /todos/:id` - Delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{auth::MessageResponse, reject_nul},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use todo_shared::{
    auth::guard::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
};
use tracing::debug;
use validator::Validate;

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(
        length(min = 1, message = "Title must not be empty"),
        custom(function = "reject_nul")
    )]
    pub title: String,

    #[validate(custom(function = "reject_nul"))]
    pub description: Option<String>,
}

/// Update request
///
/// Absent and `null` fields are both left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(
        length(min = 1, message = "Title must not be empty"),
        custom(function = "reject_nul")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "reject_nul"))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for UpdateTask {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Task as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<Task> for TodoResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
        }
    }
}

/// `POST /todos`
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let Json(req) = body?;
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    debug!(task_id = task.id, owner_id = auth.user_id, "Task created");
    Ok(Json(task.into()))
}

/// `GET /todos`
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;
    Ok(Json(tasks.into_iter().map(TodoResponse::from).collect()))
}

/// `PUT /todos/:id`
///
/// # Errors
///
/// - `404 Not Found`: No such task for this caller
/// - `422 Unprocessable Entity`: `title` supplied but empty, or a non-integer id
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let Path(id) = id?;
    let Json(req) = body?;
    req.validate()?;

    let task = Task::update(&state.db, id, auth.user_id, req.into())
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    debug!(task_id = task.id, owner_id = auth.user_id, "Task updated");
    Ok(Json(task.into()))
}

/// `DELETE /todos/:id`
///
/// Deleting the same id twice yields 404 the second time.
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    if !Task::delete(&state.db, id, auth.user_id).await? {
        return Err(ApiError::todo_not_found());
    }

    debug!(task_id = id, owner_id = auth.user_id, "Task deleted");
    Ok(Json(MessageResponse::new("Todo deleted")))
}
