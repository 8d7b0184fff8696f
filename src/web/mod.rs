use crate::config::{Config, Mode};
use crate::db::Store;
use crate::modules::tasks;
use axum::http::StatusCode;
use axum::{Router, middleware as axum_middleware, routing::get};
use std::time::Duration;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub mode: Mode,
    pub request_timeout: Duration,
}

pub mod errors;
mod handlers;
pub mod middleware;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the axum router with all modules mounted and middleware attached.
pub fn create_router(state: AppState) -> Router {
    let mode = state.mode;
    let request_timeout = state.request_timeout;

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .nest("/tasks", tasks::router())
        .fallback(handlers::not_found)
        .with_state(state);
    with_middleware(routes, mode, request_timeout)
}

/// Layers run outermost first: tracing, timeout, detail gate, panic catcher.
///
/// Request spans and response events are emitted at INFO.
fn with_middleware(routes: Router, mode: Mode, request_timeout: Duration) -> Router {
    routes
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(axum_middleware::from_fn_with_state(
            mode,
            middleware::error_detail,
        ))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Log whether the store is reachable. Failure never stops the server.
pub async fn verify_connection(store: Store) {
    match store.ping().await {
        Ok(()) => tracing::info!(url = store.url(), "database connection verified"),
        Err(err) => tracing::error!(
            url = store.url(),
            error = %err,
            "database connection check failed; requests will fail until it recovers"
        ),
    }
}

/// Start the web server described by `config` and run until shutdown.
pub async fn serve(config: &Config) -> Result<(), ServeError> {
    let store = Store::new(config.database_url.clone());
    tokio::spawn(verify_connection(store.clone()));

    let state = AppState {
        store,
        mode: config.mode,
        request_timeout: config.request_timeout(),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, mode = %config.mode, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
