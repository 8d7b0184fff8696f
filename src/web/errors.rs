use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::modules::tasks::schema::Issue;

/// Body message for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Diagnostic text attached to a 500 response as an extension.
///
/// Only [`super::middleware::error_detail`] reads it, and only outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Application error type for web handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("request failed validation")]
    Validation(Vec<Issue>),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("handler panicked: {0}")]
    Panic(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(issues) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": issues }))).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::Database(err) => {
                let detail = error_chain(&err);
                tracing::error!(error = %detail, "database error");
                internal_error(detail)
            }
            AppError::Panic(message) => {
                tracing::error!(panic = %message, "request handler panicked");
                internal_error(message)
            }
        }
    }
}

fn internal_error(detail: String) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}

/// Render an error and all of its sources as `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Turn a caught panic into the same 500 response as any other internal failure.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Panic(message).into_response()
}
