//! Logging configuration module
//! Provides structured logging with a console layer and an optional rolling JSON file layer

use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSection;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,              // log level (trace, debug, info, warn, error)
    pub file_path: Option<PathBuf>, // log directory, console only when unset
    pub rotation: LogRotation,      // log rotation policy
}

/// Log rotation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
        }
    }
}

impl From<&LoggingSection> for LoggingConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            level: section.level.clone(),
            file_path: section
                .file_logging_enabled
                .then(|| section.log_dir.clone()),
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Initialize logging. Keep the returned guard alive for the life of the
    /// process or buffered file output is lost.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
        let env_filter =
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))?;

        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .with_writer(io::stdout);

        let guard = if let Some(ref path) = self.file_path {
            let file_appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(path, "kubeconsole.log"),
                LogRotation::Daily => rolling::daily(path, "kubeconsole.log"),
                LogRotation::Never => rolling::never(path, "kubeconsole.log"),
            };

            let (non_blocking, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;

            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()?;

            None
        };

        tracing::info!("Logging initialized - level: {}", self.level);

        Ok(guard)
    }
}

/// Log a live Kubernetes API operation
#[macro_export]
macro_rules! log_k8s_operation {
    ($op:expr, $cluster_id:expr, $kind:expr) => {
        tracing::debug!(
            operation = $op,
            cluster_id = %$cluster_id,
            kind = %$kind,
            "Kubernetes operation"
        )
    };
    ($op:expr, $cluster_id:expr, $kind:expr, $($key:ident = $value:expr),+) => {
        tracing::debug!(
            operation = $op,
            cluster_id = %$cluster_id,
            kind = %$kind,
            $($key = $value),+,
            "Kubernetes operation"
        )
    };
}

/// Log a CMDB query
#[macro_export]
macro_rules! log_cmdb_query {
    ($op:expr, $table:expr) => {
        tracing::debug!(
            operation = $op,
            table = $table,
            "CMDB query"
        )
    };
    ($op:expr, $table:expr, $id:expr) => {
        tracing::debug!(
            operation = $op,
            table = $table,
            record_id = %$id,
            "CMDB query"
        )
    };
}
