use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analyzer_engine::{EngineConfig, ServiceSettings};
use analyzer_logging::analyzer_info;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "analyzer.ron";

/// Startup settings read from `analyzer.ron`; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_download_bytes: u64,
    pub output_dir: PathBuf,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            service_url: service.base_url,
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: service.request_timeout.as_secs(),
            max_download_bytes: service.max_bytes,
            output_dir: PathBuf::from("output"),
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            service: ServiceSettings {
                base_url: self.service_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
                request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
                max_bytes: self.max_download_bytes,
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let config: AppConfig =
        ron::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    analyzer_info!("Loaded configuration from {:?}", path);
    Ok(config)
}
