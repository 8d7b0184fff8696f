use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

use crate::config::Mode;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Production logs JSON lines, development the
/// human-readable format.
pub fn init(mode: Mode) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(mode)));

    let registry = tracing_subscriber::registry().with(filter);
    if mode.is_production() {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(mode: Mode) -> &'static str {
    if mode.is_production() {
        "modulith=info,tower_http=info"
    } else {
        "modulith=debug,tower_http=debug"
    }
}
