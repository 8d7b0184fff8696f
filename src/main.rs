use clap::Parser;
use modulith::config::Config;
use modulith::{logging, web};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    let config = Config::parse();

    if let Err(e) = logging::init(config.mode) {
        eprintln!("warning: logging not initialized: {e}");
    }

    if let Err(e) = web::serve(&config).await {
        tracing::error!(error = %e, "server stopped");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
