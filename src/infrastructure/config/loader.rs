use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Lowest interval the service will run at; anything shorter hammers both
/// APIs and risks overlapping a slow cycle.
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing source token. Set source.token or the GITHUB_TOKEN environment variable")]
    MissingSourceToken,

    #[error("Missing sink token. Set sink.token or ISSUESYNC_SINK__TOKEN")]
    MissingSinkToken,

    #[error("Sink API URL cannot be empty")]
    EmptySinkUrl,

    #[error("Invalid interval: {0}s. Must be at least {MIN_INTERVAL_SECS}s")]
    IntervalBelowFloor(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid timeout: {0}s. Must be at least 1")]
    InvalidTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. issuesync.yaml in the working directory
    /// 3. Environment variables (ISSUESYNC_* prefix, `__` nesting)
    pub fn load() -> Result<Config> {
        Self::load_figment(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("issuesync.yaml"))
            .merge(Env::prefixed("ISSUESYNC_").split("__")))
    }

    /// Load configuration from a specific file, still honoring env overrides.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        Self::load_figment(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("ISSUESYNC_").split("__")))
    }

    fn load_figment(figment: Figment) -> Result<Config> {
        let mut config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        // The bare GITHUB_TOKEN variable predates the ISSUESYNC_ prefix;
        // honor it when the prefixed form is absent.
        if config.source.token.is_empty() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.source.token = token;
            }
        }

        Ok(config)
    }

    /// Validate configuration after loading. A failure here is fatal at
    /// startup; the process must never enter the cycle loop misconfigured.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.source.token.is_empty() {
            return Err(ConfigError::MissingSourceToken);
        }

        if config.sink.token.is_empty() {
            return Err(ConfigError::MissingSinkToken);
        }

        if config.sink.api_url.trim().is_empty() {
            return Err(ConfigError::EmptySinkUrl);
        }

        if config.sync.interval_secs < MIN_INTERVAL_SECS {
            return Err(ConfigError::IntervalBelowFloor(config.sync.interval_secs));
        }

        if config.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.source.timeout_secs));
        }
        if config.sink.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.sink.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::DedupStrategy;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.source.token = "gh-token".to_string();
        config.sink.token = "sink-token".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.api_url, "https://api.github.com");
        assert_eq!(config.sink.api_url, "http://localhost:3002/api/v1");
        assert_eq!(config.sync.interval_secs, 300);
        assert_eq!(config.sync.dedup_strategy, DedupStrategy::Title);
        assert_eq!(config.sync.source_tag, "github");
        assert!(!config.sync.dry_run);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
source:
  token: gh-abc
  assigned_search_limit: 25
sink:
  api_url: https://tasks.example.com/api/v1
  token: sink-abc
sync:
  interval_secs: 60
  dry_run: true
  dedup_strategy: uid
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.source.token, "gh-abc");
        assert_eq!(config.source.assigned_search_limit, 25);
        assert_eq!(config.source.repo_page_size, 20, "default should fill gaps");
        assert_eq!(config.sink.api_url, "https://tasks.example.com/api/v1");
        assert_eq!(config.sync.interval_secs, 60);
        assert!(config.sync.dry_run);
        assert_eq!(config.sync.dedup_strategy, DedupStrategy::Uid);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(ConfigLoader::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_missing_source_token() {
        let mut config = valid_config();
        config.source.token = String::new();

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::MissingSourceToken
        ));
    }

    #[test]
    fn test_validate_missing_sink_token() {
        let mut config = valid_config();
        config.sink.token = String::new();

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::MissingSinkToken));
    }

    #[test]
    fn test_validate_empty_sink_url() {
        let mut config = valid_config();
        config.sink.api_url = "  ".to_string();

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::EmptySinkUrl));
    }

    #[test]
    fn test_validate_interval_below_floor() {
        let mut config = valid_config();
        config.sync.interval_secs = 5;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::IntervalBelowFloor(5)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "loud".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = valid_config();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = valid_config();
        config.sink.timeout_secs = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidTimeout(0)));
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("ISSUESYNC_SOURCE__TOKEN", Some("env-gh")),
                ("ISSUESYNC_SINK__TOKEN", Some("env-sink")),
                ("ISSUESYNC_SYNC__INTERVAL_SECS", Some("45")),
                ("ISSUESYNC_SYNC__DRY_RUN", Some("true")),
            ],
            || {
                let config = ConfigLoader::load().expect("load should succeed");
                assert_eq!(config.source.token, "env-gh");
                assert_eq!(config.sink.token, "env-sink");
                assert_eq!(config.sync.interval_secs, 45);
                assert!(config.sync.dry_run);
            },
        );
    }

    #[test]
    fn test_bare_github_token_fallback() {
        temp_env::with_vars(
            [
                ("GITHUB_TOKEN", Some("bare-token")),
                ("ISSUESYNC_SOURCE__TOKEN", None::<&str>),
            ],
            || {
                let config = ConfigLoader::load().expect("load should succeed");
                assert_eq!(config.source.token, "bare-token");
            },
        );
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "source:\n  token: file-gh\nsink:\n  token: file-sink\nsync:\n  interval_secs: 120"
        )
        .unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [("ISSUESYNC_SYNC__INTERVAL_SECS", Some("600"))],
            || {
                let config = ConfigLoader::load_from_file(file.path()).expect("load should succeed");
                assert_eq!(config.source.token, "file-gh");
                assert_eq!(config.sync.interval_secs, 600, "env should win over file");
            },
        );
    }
}
