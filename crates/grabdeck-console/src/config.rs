/*
[INPUT]:  Optional YAML configuration file, GRABDECK_* environment variables
[OUTPUT]: Validated console configuration
[POS]:    Configuration layer - service endpoint, timing and download defaults
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File, FileFormat};
use grabdeck_adapter::{ClientConfig, DownloadOptions};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dispatch::DEFAULT_SETTLE_DELAY;

pub const ENV_PREFIX: &str = "GRABDECK";

/// Top-level configuration for the download console
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub notifications: NotificationConfig,
    /// Options sent with every new download unless overridden
    pub defaults: DownloadOptions,
}

/// Download service endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: grabdeck_adapter::http::client::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Poll cadence
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    /// Wait before polling after a download was accepted
    pub start_settle_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            start_settle_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn start_settle(&self) -> Duration {
        Duration::from_millis(self.start_settle_ms)
    }
}

/// Toast timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub display_ms: u64,
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: 3000,
            exit_ms: 300,
        }
    }
}

impl NotificationConfig {
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

impl ConsoleConfig {
    /// Load from `path` (missing file is fine) layered under GRABDECK_*
    /// environment variables, e.g. `GRABDECK_SERVER__BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_path(),
        };

        let mut builder = Config::builder();
        if let Some(path) = &path {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            );
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file only
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.poll_interval_ms == 0 {
            bail!("sync.poll_interval_ms must be greater than zero");
        }
        let url = Url::parse(&self.server.base_url)
            .with_context(|| format!("invalid server.base_url {:?}", self.server.base_url))?;
        if url.cannot_be_a_base() {
            bail!("server.base_url must be an http(s) URL");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.server.timeout_secs),
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("serialize configuration")
    }
}

/// `<config dir>/grabdeck/config.yaml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grabdeck").join("config.yaml"))
}
