//! Logging setup for binaries built on this crate.
//!
//! The library only emits `tracing` events; it never installs a subscriber.
//! Binaries call [`init_logging`] once at startup.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: standard filter directives (e.g. `pixel_pool=trace`)
//! - `PIXEL_POOL_LOG_LEVEL`: plain level used when `RUST_LOG` is unset

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable for a simple level override.
pub const LOG_LEVEL_ENV: &str = "PIXEL_POOL_LOG_LEVEL";

fn build_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs a human-readable stderr subscriber. Later calls are no-ops, as is
/// the first call if another global subscriber is already installed.
pub fn init_logging() {
    TRACING_INITIALIZED.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(build_filter())
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init();
    });
}
