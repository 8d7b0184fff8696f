use axum::Json;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::errors::{ErrorDetail, INTERNAL_ERROR_MESSAGE};
use crate::config::Mode;

/// Add the diagnostic `detail` to internal-error bodies in development mode.
///
/// In production the extension is dropped and the generic body goes out untouched.
pub async fn error_detail(State(mode): State<Mode>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if mode.is_production() {
        return response;
    }

    let status = response.status();
    (
        status,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE, "detail": detail })),
    )
        .into_response()
}
