use crate::deduplication::DeduplicationConfig;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
/// Environment variable overriding the backend base URL
pub const BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
#[serde(default)]
#[get = "pub"]
pub struct ClientConfig {
    base_url: String,
    deduplication: DeduplicationConfig,
    /// Deadline for documentation searches
    search_timeout_secs: u64,
    /// Where the unread badge count is persisted, if anywhere
    badge_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            deduplication: DeduplicationConfig::default(),
            search_timeout_secs: 10,
            badge_path: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the optional YAML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(ClientConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }

        let config: ClientConfig = figment
            .merge(Env::raw().only(&[BASE_URL_ENV]).map(|_| "base_url".into()))
            .extract()?;
        log::debug!("Loaded client config with base URL {}", config.base_url);
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_deduplication(mut self, deduplication: DeduplicationConfig) -> Self {
        self.deduplication = deduplication;
        self
    }

    pub fn with_badge_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.badge_path = Some(path.into());
        self
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}
