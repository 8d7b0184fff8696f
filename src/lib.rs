/// Server settings: connection string, bind address, mode.
pub mod config;
/// Store client: connection bootstrap, shared handle, errors.
pub mod db;
/// Tracing subscriber setup.
pub mod logging;
/// Data types: Task, NewTask, TaskStats.
pub mod models;
/// Feature modules, each with schema, repository, service, controller and router.
pub mod modules;
/// Axum root router, middleware and server loop.
pub mod web;
