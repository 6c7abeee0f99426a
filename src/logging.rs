//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level priority:
//! 1. explicit level passed by the caller
//! 2. `PROJECT_PLANNER_LOG` environment variable
//! 3. the configured fallback
//! 4. `warn`
//!
//! Output goes to stderr so the CLI's stdout stays clean.

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;

pub const LOG_ENV: &str = "PROJECT_PLANNER_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(explicit: Option<&str>, configured: Option<&str>) -> Result<()> {
    let level = explicit
        .and_then(parse_level_str)
        .or_else(|| {
            std::env::var(LOG_ENV)
                .ok()
                .and_then(|s| parse_level_str(&s))
        })
        .or_else(|| configured.and_then(parse_level_str))
        .unwrap_or(tracing::Level::WARN);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
