use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use applier_core::{ConfigError, SchedulerConfig};
use applier_engine::{ApplicantProfile, BackendSettings, SearchQuery, SuccessRule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::logging::LogConfig;

pub const DEFAULT_CONFIG_PATH: &str = "./applier.ron";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub batch_size: usize,
    pub interval_minutes: u64,
    pub search: SearchQuery,
    pub profile: ApplicantProfile,
    pub success_rule: SuccessRule,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            backend_url: backend.base_url,
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            batch_size: 3,
            interval_minutes: 120,
            search: SearchQuery::default(),
            profile: ApplicantProfile::default(),
            success_rule: SuccessRule::default(),
            log: LogConfig::default(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// The default file was absent.
    Defaults,
}

impl AppConfig {
    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// Only a missing *default* file falls back to built-in defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigOrigin), ConfigFileError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok((Self::default(), ConfigOrigin::Defaults));
            }
            Err(source) => return Err(ConfigFileError::Read { path, source }),
        };
        let config = Self::parse(&content).map_err(|message| ConfigFileError::Parse {
            path: path.clone(),
            message,
        })?;
        Ok((config, ConfigOrigin::File(path)))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(batch_size) = cli.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(minutes) = cli.interval_minutes {
            self.interval_minutes = minutes;
        }
        if let Some(url) = &cli.backend_url {
            self.backend_url = url.clone();
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        SchedulerConfig::new(
            self.batch_size,
            Duration::from_secs(self.interval_minutes.saturating_mul(60)),
        )
    }
}
