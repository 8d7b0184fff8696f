
use std::collections::HashMap;

use cucumber::World;
use modulith::config::Mode;

/// Shared state carried through each scenario.
#[derive(Debug, Default, World)]
pub struct ModulithWorld {
    /// Temporary directory that owns the database file.
    pub db_dir: Option<tempfile::TempDir>,
    /// Connection string handed to the server's store.
    pub database_url: Option<String>,
    /// Mode the in-process server is started in.
    pub mode: Mode,
    /// Port of the in-process server, once started.
    pub server_port: Option<u16>,
    /// Keeps the server task reachable for the lifetime of the scenario.
    pub server_handle: Option<tokio::task::JoinHandle<()>>,
    pub http_client: reqwest::Client,
    pub last_response_status: Option<u16>,
    pub last_response_content_type: Option<String>,
    pub last_response_body: Option<String>,
    /// Alias to actual task ID map, populated by create steps.
    pub task_ids: HashMap<String, String>,
}

#[tokio::main]
async fn main() {
    ModulithWorld::run("tests/features").await;
}
