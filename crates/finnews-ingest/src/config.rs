//! Configuration management

use std::path::PathBuf;

use crate::decode::{EpochUnit, NaiveTimestamps, TimestampPolicy};
use crate::error::Result;
use crate::validate::ValidationRules;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default SQLite database location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/documents.db";

/// Environment variable overriding the database location.
pub const ENV_DB_PATH: &str = "FINNEWS_DB_PATH";

/// Environment variable selecting the naive timestamp policy (`utc`, `reject`, `+03:00`).
pub const ENV_NAIVE_TIMESTAMPS: &str = "FINNEWS_NAIVE_TIMESTAMPS";

/// Environment variable selecting the epoch unit (`seconds`, `milliseconds`).
pub const ENV_EPOCH_UNIT: &str = "FINNEWS_EPOCH_UNIT";

/// Ingestion configuration
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub db_path: PathBuf,
    pub timestamp_policy: TimestampPolicy,
    pub validation: ValidationRules,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timestamp_policy: TimestampPolicy::default(),
            validation: ValidationRules::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment and defaults.
    ///
    /// Unset or empty variables keep their defaults; unparseable values are
    /// errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = env_value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(naive) = env_value(ENV_NAIVE_TIMESTAMPS) {
            config.timestamp_policy.naive = naive.parse::<NaiveTimestamps>()?;
        }
        if let Some(unit) = env_value(ENV_EPOCH_UNIT) {
            config.timestamp_policy.epoch_unit = unit.parse::<EpochUnit>()?;
        }

        Ok(config)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_DB_PATH);
        std::env::remove_var(ENV_NAIVE_TIMESTAMPS);
        std::env::remove_var(ENV_EPOCH_UNIT);
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();

        let config = IngestConfig::from_env().unwrap();
        assert_eq!(config, IngestConfig::default());
        assert_eq!(config.db_path, PathBuf::from("data/documents.db"));
        assert_eq!(config.timestamp_policy.naive, NaiveTimestamps::AssumeUtc);
        assert_eq!(config.timestamp_policy.epoch_unit, EpochUnit::Seconds);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_DB_PATH, "/tmp/finnews/news.db");
        std::env::set_var(ENV_NAIVE_TIMESTAMPS, "+03:00");
        std::env::set_var(ENV_EPOCH_UNIT, "milliseconds");

        let config = IngestConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.db_path, PathBuf::from("/tmp/finnews/news.db"));
        assert_eq!(
            config.timestamp_policy.naive,
            NaiveTimestamps::AssumeOffset(FixedOffset::east_opt(3 * 3600).unwrap())
        );
        assert_eq!(config.timestamp_policy.epoch_unit, EpochUnit::Milliseconds);
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_an_error() {
        clear_env();
        std::env::set_var(ENV_EPOCH_UNIT, "fortnights");

        let result = IngestConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_empty_env_value_keeps_default() {
        clear_env();
        std::env::set_var(ENV_DB_PATH, "  ");

        let config = IngestConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }
}
