//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Execution queue settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Worker pool settings
    #[serde(default)]
    pub worker: WorkerConfig,

    /// DUT feature export settings
    #[serde(default)]
    pub features: FeatureConfig,
}

/// Execution queue settings
#[derive(Debug, Deserialize)]
pub struct QueueConfig {
    /// Name given to the queue built by the CLI
    #[serde(default = "default_queue_name")]
    pub name: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
        }
    }
}

fn default_queue_name() -> String {
    "default".to_string()
}

/// Worker pool settings
#[derive(Debug, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent workers
    #[serde(default = "default_worker_count")]
    pub count: usize,

    /// How long a worker waits on an empty queue before it exits
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
            idle_timeout_ms: default_idle_timeout(),
        }
    }
}

impl WorkerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

fn default_worker_count() -> usize {
    1
}

fn default_idle_timeout() -> u64 {
    500
}

/// DUT feature export settings
#[derive(Debug, Deserialize)]
pub struct FeatureConfig {
    /// Separator placed between `name=value` entries of the feature list
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    ";".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;

        if config.worker.count == 0 {
            return Err(super::Error::Config(
                "worker.count must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.queue.name, "default");
        assert_eq!(config.worker.idle_timeout(), Duration::from_millis(500));
        assert_eq!(config.worker.count, 1);
        assert_eq!(config.features.delimiter, ";");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [queue]
            name = "vht"

            [worker]
            count = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.queue.name, "vht");
        assert_eq!(config.worker.count, 4);
        assert_eq!(config.worker.idle_timeout_ms, 500);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = Config::parse("[worker]\ncount = 0\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = Config::parse("[queue\nname=").unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse(_)));
    }
}
