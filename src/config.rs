// Runtime settings for the CLI.
//
// The API origin is a compile-time constant: pointing the client at another
// server means editing `BASE_URL`. Only the log level comes from the
// environment.

use crate::error::ConfigError;
use tracing::Level;

/// Origin plus `/api` prefix of the quiz backend.
pub const BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub log_level: Level,
}

impl Config {
    /// Build the configuration, reading `RUST_LOG` for the log level.
    /// Defaults to `WARN` so log lines do not interleave with the menus.
    pub fn load() -> Result<Self, ConfigError> {
        let log_level = match std::env::var("RUST_LOG") {
            Ok(raw) => parse_level(&raw)?,
            Err(_) => Level::WARN,
        };
        Ok(Self {
            base_url: BASE_URL.to_string(),
            log_level,
        })
    }
}

fn parse_level(raw: &str) -> Result<Level, ConfigError> {
    raw.trim().parse::<Level>().map_err(|_| {
        ConfigError::InvalidValue(
            "RUST_LOG".to_string(),
            format!("'{}' is not a valid log level", raw),
        )
    })
}
