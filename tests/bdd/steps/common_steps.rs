use cucumber::given;
use modulith::config::Mode;

use crate::ModulithWorld;

/// Point the world at a new database file inside a temp dir.
#[given("a fresh database")]
async fn a_fresh_database(world: &mut ModulithWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("app.db");

    world.database_url = Some(format!("sqlite://{}", db_path.display()));
    // Keep the TempDir alive for the lifetime of the scenario.
    world.db_dir = Some(dir);
}

/// Point the world at a database path whose directory does not exist, so
/// every open attempt fails.
#[given("an unreachable database")]
async fn an_unreachable_database(world: &mut ModulithWorld) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("missing").join("app.db");

    world.database_url = Some(format!("sqlite://{}", db_path.display()));
    world.db_dir = Some(dir);
}

#[given("the server runs in production mode")]
async fn the_server_runs_in_production_mode(world: &mut ModulithWorld) {
    world.mode = Mode::Production;
}
