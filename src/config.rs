use clap::{Parser, ValueEnum};
use std::fmt;
use std::time::Duration;

/// Deployment mode. Controls log format and whether 500 responses carry diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        self == Mode::Production
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "modulith",
    version,
    about = "Modular-monolith REST API starter"
)]
pub struct Config {
    /// Store connection string (sqlite://path, a bare path, or :memory:)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://modulith.db")]
    pub database_url: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// development or production
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = Mode::Development)]
    pub mode: Mode,

    /// Seconds before an in-flight request is abandoned
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
