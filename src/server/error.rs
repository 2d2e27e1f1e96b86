use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NoInput | AppError::InvalidForm(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::Tool { code, stderr } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "sldl search failed",
                    "details": stderr,
                    "returncode": code,
                }),
            ),
            AppError::Io(_) | AppError::Spawn(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
