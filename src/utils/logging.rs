//! Logging initialization
//!
//! Filter precedence: `RUST_LOG`, then the configured filter, then `info`.
//! Output goes to stderr; `NO_COLOR` disables ANSI colors.
//!
//! # Usage
//! ```rust,no_run
//! use actor_modules::utils::init_logging;
//!
//! init_logging(Some("actor_modules=debug"));
//! ```

use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::env::{env_opt, env_present};

const DEFAULT_FILTER: &str = "info";

fn resolve_filter(filter: Option<&str>) -> EnvFilter {
    if env_opt("RUST_LOG").is_some() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER))
}

/// Initialize human-readable logging
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging(filter: Option<&str>) {
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(!env_present("NO_COLOR")),
        )
        .with(resolve_filter(filter))
        .try_init();

    if result.is_err() {
        debug!("Logging already initialized");
    }
}

/// Initialize JSON logging for log aggregation
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) {
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(resolve_filter(filter))
        .try_init();

    if result.is_err() {
        debug!("Logging already initialized");
    }
}

/// Initialize logging from the `[logging]` config section
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    let filter = config.and_then(|c| c.filter.as_deref());

    if config.map(|c| c.json_format).unwrap_or(false) {
        #[cfg(feature = "json-logging")]
        {
            init_json_logging(filter);
            return;
        }
        #[cfg(not(feature = "json-logging"))]
        {
            debug!("json_format requested without the json-logging feature");
        }
    }

    init_logging(filter);
}
