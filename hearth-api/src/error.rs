use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hearth_core::WorkflowError;

#[derive(Debug)]
pub enum AppError {
    Workflow(WorkflowError),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Workflow(err) => {
                let status = match &err {
                    WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
                    WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
                    WorkflowError::Conflict(_) => StatusCode::CONFLICT,
                    WorkflowError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };

                // Carry enough context for the caller to decide on retry
                // or user messaging
                let body = match &err {
                    WorkflowError::InvalidTransition { from, to, reason } => Json(json!({
                        "error": err.to_string(),
                        "kind": "invalid_transition",
                        "current_state": from,
                        "attempted_state": to,
                        "reason": reason,
                    })),
                    WorkflowError::Validation(msg) => Json(json!({
                        "error": err.to_string(),
                        "kind": "validation",
                        "reason": msg,
                    })),
                    WorkflowError::NotFound(what) => Json(json!({
                        "error": err.to_string(),
                        "kind": "not_found",
                        "resource": what,
                    })),
                    WorkflowError::Conflict(what) => Json(json!({
                        "error": err.to_string(),
                        "kind": "conflict",
                        "resource": what,
                    })),
                };

                (status, body).into_response()
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                let body = Json(json!({ "error": "Internal Server Error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        Self::Workflow(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
