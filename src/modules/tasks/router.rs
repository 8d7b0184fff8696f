use axum::Router;
use axum::routing::get;

use super::controller;
use crate::web::AppState;

/// Routes for the tasks module, relative to its mount point.
///
/// `/stats` is registered ahead of `/{id}` so the literal segment is never
/// captured as an id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list).post(controller::create))
        .route("/stats", get(controller::stats))
        .route(
            "/{id}",
            get(controller::get)
                .patch(controller::update)
                .delete(controller::delete),
        )
}
