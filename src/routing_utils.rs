use crate::domain::todo::driving_ports::TodoError;
use crate::dto::ErrorMessage;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;
use serde::Serialize;
use tracing::error;

/// Message reported when a route expected an ID in its path but couldn't extract one
pub const MISSING_ID_MESSAGE: &str = "failed to receive id";

/// Response type for every failure on the API. Existing clients only look at the body, so errors
/// are reported as `{"error": "..."}` with a 200 status instead of a 4xx/5xx code.
#[derive(Debug)]
pub struct ErrorPayload {
    message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorPayload {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ErrorPayload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            axum::Json(ErrorMessage {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TodoError> for ErrorPayload {
    fn from(value: TodoError) -> Self {
        match value {
            TodoError::NotFound(_) => ErrorPayload::new(value.to_string()),
            TodoError::PortError(err) => ErrorPayload::from(err),
        }
    }
}

impl From<anyhow::Error> for ErrorPayload {
    fn from(value: anyhow::Error) -> Self {
        error!("Storage operation failed: {value:#}");
        ErrorPayload::new(value.to_string())
    }
}

impl From<JsonRejection> for ErrorPayload {
    fn from(value: JsonRejection) -> Self {
        ErrorPayload::new(value.body_text())
    }
}

impl From<PathRejection> for ErrorPayload {
    fn from(value: PathRejection) -> Self {
        error!("Could not extract the todo ID from the path: {}", value.body_text());
        ErrorPayload::new(MISSING_ID_MESSAGE)
    }
}

/// Wrapper for [axum::Json] which reports malformed bodies through [ErrorPayload]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorPayload))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
