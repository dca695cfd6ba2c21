//! Process configuration, read from the environment.

use std::path::PathBuf;

use lingoledger_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "LINGOLEDGER_LOG_FORMAT";
pub const SEED_FILE_VAR: &str = "LINGOLEDGER_SEED_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub log_format: LogFormat,
    /// JSON seed document; the built-in seed is used when unset.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "{} invalid; using json", LOG_FORMAT_VAR);
                LogFormat::default()
            }),
            None => LogFormat::default(),
        };

        let seed_file = lookup(SEED_FILE_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Self {
            log_format,
            seed_file,
        }
    }
}
