//! Todo CRUD and report endpoints.
//!
//! Thin request/response mapping over the task store:
//! - List todos (newest first)
//! - Download the task list as a PDF report
//! - Get / create / update / delete a single todo

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::report;
use crate::task::{self, NewTask, Priority, Task, TaskPatch, ValidationError};

use super::routes::AppState;

/// Create todo routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/download/pdf", get(download_pdf))
        .route(
            "/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Raw create body. Fields are loose so that missing or malformed values
/// surface as 400 validation errors instead of body-rejection responses.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl CreateTodoRequest {
    fn validate(self) -> Result<NewTask, ValidationError> {
        Ok(NewTask {
            title: task::validate_title(self.title.as_deref())?,
            description: task::validate_description(self.description.as_deref())?,
            priority: self
                .priority
                .as_deref()
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        })
    }
}

/// Raw update body. Absent fields are left unchanged; a present-but-blank
/// description clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    fn validate(self) -> Result<TaskPatch, ValidationError> {
        let title = self
            .title
            .as_deref()
            .map(|t| task::validate_title(Some(t)))
            .transpose()?;
        let description = self
            .description
            .as_deref()
            .map(|d| task::validate_description(Some(d)))
            .transpose()?;
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;

        Ok(TaskPatch {
            title,
            description,
            priority,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListTodosResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub data: Task,
}

#[derive(Debug, Serialize)]
pub struct DeleteTodoResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Task,
}

/// PDF bytes served as a download with the fixed report filename.
pub struct PdfAttachment(pub Vec<u8>);

impl IntoResponse for PdfAttachment {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", report::REPORT_FILENAME),
                ),
            ],
            self.0,
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/todos - List all todos, newest first.
async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListTodosResponse>, ApiError> {
    let data = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::store("Error fetching todos", e))?;
    Ok(Json(ListTodosResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// GET /api/todos/download/pdf - Render the task list as a PDF report.
async fn download_pdf(State(state): State<Arc<AppState>>) -> Result<PdfAttachment, ApiError> {
    let tasks = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::store("Error generating PDF", e))?;

    // Rendering is CPU-bound; run it off the request path. A panicked
    // render surfaces as a 500 instead of tearing down the connection.
    let bytes = tokio::task::spawn_blocking(move || report::generate(&tasks))
        .await
        .map_err(|e| ApiError::Render(e.to_string()))?;

    Ok(PdfAttachment(bytes))
}

/// GET /api/todos/:id - Get a single todo.
async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoResponse>, ApiError> {
    let data = state
        .store
        .get(id)
        .await
        .map_err(|e| ApiError::store("Error fetching todo", e))?;
    Ok(Json(TodoResponse {
        success: true,
        data,
    }))
}

/// POST /api/todos - Create a new todo.
async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let new = req.validate()?;
    let data = state
        .store
        .create(new)
        .await
        .map_err(|e| ApiError::store("Error creating todo", e))?;

    tracing::info!("Created todo {} ({})", data.title, data.id);

    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            success: true,
            data,
        }),
    ))
}

/// PUT /api/todos/:id - Update a todo (partial or full field set).
async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let patch = req.validate()?;
    let data = state
        .store
        .update(id, patch)
        .await
        .map_err(|e| ApiError::store("Error updating todo", e))?;
    Ok(Json(TodoResponse {
        success: true,
        data,
    }))
}

/// DELETE /api/todos/:id - Delete a todo and return its last snapshot.
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let data = state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::store("Error deleting todo", e))?;

    tracing::info!("Deleted todo {}", data.id);

    Ok(Json(DeleteTodoResponse {
        success: true,
        message: "Todo deleted successfully",
        data,
    }))
}
