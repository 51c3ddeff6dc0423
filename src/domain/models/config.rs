//! Configuration model.
//!
//! An explicit configuration struct constructed once at startup and passed
//! into the driver and the HTTP adapters; nothing in the engine reads
//! ambient global state.

use serde::{Deserialize, Serialize};

use crate::domain::identity::DedupStrategy;

/// Main configuration structure for issuesync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Source issue tracker (GitHub) connection
    #[serde(default)]
    pub source: SourceConfig,

    /// Sink task service connection
    #[serde(default)]
    pub sink: SinkConfig,

    /// Reconciliation behavior
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source issue-tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourceConfig {
    /// API token (also read from GITHUB_TOKEN when unset)
    #[serde(default)]
    pub token: String,

    /// API base URL
    #[serde(default = "default_source_api_url")]
    pub api_url: String,

    /// Upper bound on assigned-issue search results per cycle
    #[serde(default = "default_assigned_search_limit")]
    pub assigned_search_limit: usize,

    /// Issues fetched per owned repository per cycle
    #[serde(default = "default_repo_page_size")]
    pub repo_page_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_source_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_assigned_search_limit() -> usize {
    50
}

const fn default_repo_page_size() -> usize {
    20
}

const fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_source_api_url(),
            assigned_search_limit: default_assigned_search_limit(),
            repo_page_size: default_repo_page_size(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Sink task-service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SinkConfig {
    /// API base URL (trailing slash tolerated)
    #[serde(default = "default_sink_api_url")]
    pub api_url: String,

    /// Bearer token sent on every call
    #[serde(default)]
    pub token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sink_api_url() -> String {
    "http://localhost:3002/api/v1".to_string()
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            api_url: default_sink_api_url(),
            token: String::new(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Reconciliation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncConfig {
    /// Seconds between cycles; must be at least the enforced floor
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Log every mutating action instead of performing it
    #[serde(default)]
    pub dry_run: bool,

    /// Task identity derivation; one strategy per deployment
    #[serde(default)]
    pub dedup_strategy: DedupStrategy,

    /// Fixed tag attached to every created task alongside the repo name
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
}

const fn default_interval_secs() -> u64 {
    300
}

fn default_source_tag() -> String {
    "github".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            dry_run: false,
            dedup_strategy: DedupStrategy::default(),
            source_tag: default_source_tag(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
