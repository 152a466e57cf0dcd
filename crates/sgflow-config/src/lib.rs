pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";
pub const DEFAULT_SUBJECT: &str = "firewall.update.aws";

const CONFIG_PATH_ENV: &str = "SGFLOW_CONFIG_PATH";
const NATS_URL_ENV: &str = "NATS_URI";
const SUBJECT_ENV: &str = "SGFLOW_SUBJECT";
const QUEUE_GROUP_ENV: &str = "SGFLOW_QUEUE_GROUP";

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// NATS server URL
    pub nats_url: String,

    /// Subject change requests arrive on
    pub subject: String,

    /// Queue group shared by daemon replicas, if any
    pub queue_group: Option<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            nats_url: DEFAULT_NATS_URL.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            queue_group: None,
        }
    }
}

impl DaemonConfig {
    /// Subject successful requests are published to
    pub fn done_subject(&self) -> String {
        format!("{}.done", self.subject)
    }

    /// Subject failed requests are published to
    pub fn error_subject(&self) -> String {
        format!("{}.error", self.subject)
    }

    /// Read a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Some(url) = non_empty_var(NATS_URL_ENV) {
            self.nats_url = url;
        }
        if let Some(subject) = non_empty_var(SUBJECT_ENV) {
            self.subject = subject;
        }
        if let Ok(group) = std::env::var(QUEUE_GROUP_ENV) {
            self.queue_group = if group.is_empty() { None } else { Some(group) };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nats_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: "nats_url",
                reason: "must not be empty".to_string(),
            });
        }

        if self.subject.is_empty() {
            return Err(ConfigError::Invalid {
                key: "subject",
                reason: "must not be empty".to_string(),
            });
        }

        // Reply subjects are derived by suffixing, which breaks on wildcards
        if self.subject.contains(['*', '>']) {
            return Err(ConfigError::Invalid {
                key: "subject",
                reason: format!("wildcards are not allowed: {}", self.subject),
            });
        }

        Ok(())
    }

    /// Load configuration: defaults, then the config file, then environment
    ///
    /// The result is not validated; callers layer their own overrides on top
    /// and call [`DaemonConfig::validate`] once at the end.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same as [`DaemonConfig::load`] but with an explicit file path
    ///
    /// An explicit path must exist; a discovered one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) if !p.exists() => return Err(ConfigError::FileNotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file()?,
        };

        let mut config = match &path {
            Some(p) => {
                tracing::debug!("Loading config from {}", p.display());
                Self::from_file(p)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// sgflow's per-user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sgflow"))
}

/// Find the daemon config file
///
/// Search order:
/// 1. `SGFLOW_CONFIG_PATH` (must exist when set)
/// 2. current directory: sgflow.yaml, .sgflow.yaml
/// 3. ~/.config/sgflow/config.yaml
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["sgflow.yaml", ".sgflow.yaml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}
