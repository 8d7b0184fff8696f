use cucumber::{given, then, when};
use std::time::Duration;

use modulith::db::Store;
use modulith::web::{AppState, create_router};

use crate::ModulithWorld;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Start an in-process axum test server using the world's database URL and mode.
/// Binds to a random free port (port 0), stores the port and task handle
/// in the world for later use.
pub async fn start_test_server(world: &mut ModulithWorld) -> u16 {
    let database_url = world
        .database_url
        .clone()
        .expect("database_url not set — did you forget 'Given a fresh database'?");

    let state = AppState {
        store: Store::new(database_url),
        mode: world.mode,
        request_timeout: Duration::from_secs(10),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to ephemeral port");
    let port = listener
        .local_addr()
        .expect("failed to get local addr")
        .port();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("web server error in test");
    });

    world.server_port = Some(port);
    world.server_handle = Some(handle);

    // Brief poll to ensure the server is accepting connections before the
    // scenario's When/Then steps run.  We try up to 20 times (100 ms total).
    for _ in 0..20 {
        if world
            .http_client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    port
}

/// Record status, content type and body of a response on the world.
pub async fn record_response(world: &mut ModulithWorld, resp: reqwest::Response) -> (u16, String) {
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| panic!("failed to read response body: {e}"));
    world.last_response_status = Some(status);
    world.last_response_content_type = content_type;
    world.last_response_body = Some(body.clone());
    (status, body)
}

/// Build an absolute URL for `path` on the running test server.
pub fn url_for(world: &ModulithWorld, path: &str) -> String {
    let port = world
        .server_port
        .expect("server not started — add 'Given the web server is running'");
    format!("http://127.0.0.1:{port}{path}")
}

/// Perform a GET request against the running test server.
pub async fn http_get(world: &mut ModulithWorld, path: &str) -> (u16, String) {
    let url = url_for(world, path);
    let resp = world
        .http_client
        .get(&url)
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {url} failed: {e}"));
    record_response(world, resp).await
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

/// Start the in-process web server backed by the world's database.
#[given("the web server is running")]
async fn the_web_server_is_running(world: &mut ModulithWorld) {
    start_test_server(world).await;
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

/// Perform a GET request to `path` on the test server and store the response.
#[when(expr = "I GET {string}")]
async fn i_get_path(world: &mut ModulithWorld, path: String) {
    http_get(world, &path).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

/// Assert that the most recent HTTP response had the given status code.
#[then(expr = "the response status is {int}")]
async fn the_response_status_is(world: &mut ModulithWorld, expected: u16) {
    let actual = world
        .last_response_status
        .expect("no HTTP response recorded — did you make a request?");
    assert_eq!(
        actual,
        expected,
        "expected HTTP status {expected} but got {actual}; body: {}",
        world.last_response_body.as_deref().unwrap_or("")
    );
}

/// Assert that the most recent HTTP response body contains the given substring.
#[then(expr = "the response body contains {string}")]
async fn the_response_body_contains(world: &mut ModulithWorld, expected: String) {
    let body = world
        .last_response_body
        .as_deref()
        .expect("no HTTP response body recorded — did you make a request?");
    assert!(
        body.contains(&expected),
        "expected response body to contain {expected:?}, but body was:\n{body}"
    );
}

#[then(expr = "the response body does not contain {string}")]
async fn the_response_body_does_not_contain(world: &mut ModulithWorld, unexpected: String) {
    let body = world
        .last_response_body
        .as_deref()
        .expect("no HTTP response body recorded — did you make a request?");
    assert!(
        !body.contains(&unexpected),
        "expected response body NOT to contain {unexpected:?}, but body was:\n{body}"
    );
}

#[then("the response body is empty")]
async fn the_response_body_is_empty(world: &mut ModulithWorld) {
    let body = world
        .last_response_body
        .as_deref()
        .expect("no HTTP response body recorded — did you make a request?");
    assert!(body.is_empty(), "expected an empty body but got:\n{body}");
}

/// Assert that the most recent HTTP response has a Content-Type header
/// containing the given value (partial match, e.g. "application/json").
#[then(expr = "the response content type is {string}")]
async fn the_response_content_type_is(world: &mut ModulithWorld, expected: String) {
    let actual = world
        .last_response_content_type
        .as_deref()
        .unwrap_or("<no content-type header>");
    assert!(
        actual.contains(&expected),
        "expected Content-Type to contain {expected:?} but got {actual:?}"
    );
}
