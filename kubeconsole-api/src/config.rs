//! Configuration management for the Kubeconsole API
//!
//! This module provides a centralized configuration system that loads settings from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)
//!
//! The loaded [`ConsoleConfig`] is built once at startup and shared read-only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct for Kubeconsole
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// CMDB database configuration
    pub database: DatabaseConfig,
    /// List view paging
    pub paging: PagingConfig,
    /// Cluster client settings
    pub kubernetes: KubernetesConfig,
    /// Logging configuration
    pub logging: LoggingSection,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite:///var/lib/kubeconsole/cmdb.db")
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Create the CMDB tables when missing
    pub run_migrations: bool,
}

/// Paging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Rows per list page
    pub page_size: usize,
}

/// Cluster client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Connect timeout for API server calls, 0 disables it
    pub connect_timeout_secs: u64,
    /// Read timeout for API server calls, 0 disables it
    pub read_timeout_secs: u64,
    pub client_cache: ClientCacheConfig,
}

/// Authenticated client cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCacheConfig {
    pub enabled: bool,
    /// Seconds a cached client stays usable
    pub ttl_secs: u64,
    /// Upper bound on cached clusters
    pub max_entries: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:///var/lib/kubeconsole/cmdb.db".to_string(),
            max_connections: 10,
            run_migrations: false,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
            client_cache: ClientCacheConfig::default(),
        }
    }
}

impl Default for ClientCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 60,
            max_entries: 64,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/kubeconsole"),
            file_logging_enabled: false,
        }
    }
}

impl KubernetesConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            match Self::load_from_file(&config_path) {
                Ok(file_config) => config = file_config,
                Err(e) => tracing::warn!("Ignoring config file: {}", e),
            }
        }

        config.apply_env_overrides();

        config
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("KUBECONSOLE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/kubeconsole/config.toml")),
            Some(PathBuf::from("./kubeconsole.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("KUBECONSOLE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("KUBECONSOLE_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Database
        if let Some(url) = lookup("KUBECONSOLE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(max) = lookup("KUBECONSOLE_DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = max;
        }
        if let Some(run) = lookup("KUBECONSOLE_RUN_MIGRATIONS").and_then(|v| v.parse().ok()) {
            self.database.run_migrations = run;
        }

        // Paging
        if let Some(size) = lookup("KUBECONSOLE_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            self.paging.page_size = size;
        }

        // Kubernetes
        if let Some(secs) = lookup("KUBECONSOLE_CONNECT_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.kubernetes.connect_timeout_secs = secs;
        }
        if let Some(secs) = lookup("KUBECONSOLE_READ_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.kubernetes.read_timeout_secs = secs;
        }
        if let Some(enabled) = lookup("KUBECONSOLE_CLIENT_CACHE").and_then(|v| v.parse().ok()) {
            self.kubernetes.client_cache.enabled = enabled;
        }
        if let Some(ttl) = lookup("KUBECONSOLE_CLIENT_CACHE_TTL").and_then(|v| v.parse().ok()) {
            self.kubernetes.client_cache.ttl_secs = ttl;
        }

        // Logging
        if let Some(level) = lookup("KUBECONSOLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("KUBECONSOLE_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
            self.logging.file_logging_enabled = true;
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Validation("Database URL cannot be empty".to_string()));
        }

        if self.paging.page_size == 0 {
            return Err(ConfigError::Validation("Page size must be greater than 0".to_string()));
        }

        let cache = &self.kubernetes.client_cache;
        if cache.enabled && (cache.max_entries == 0 || cache.ttl_secs == 0) {
            return Err(ConfigError::Validation(
                "Client cache needs a non-zero ttl and capacity when enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to read configuration file
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    Parse(String),
    /// Configuration validation failed
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, err) => {
                write!(f, "Failed to read config file {:?}: {}", path, err)
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse config: {}", err),
            ConfigError::Validation(err) => write!(f, "Config validation failed: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}
