use crate::core::error::ChatError;
use crate::core::usage::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Simulated,
    Echo,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simulated" => Some(ProviderKind::Simulated),
            "echo" => Some(ProviderKind::Echo),
            _ => None,
        }
    }
}

/// When a dispatch also counts as super-search usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPolicy {
    /// Only while the `web` connector is active
    #[default]
    WebConnector,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model used when the selected id is not in the catalog
    pub default_model: String,
    /// Name shown for model ids the catalog does not know
    pub fallback_name: String,
    pub provider: ProviderKind,
    pub simulated_delay_ms: u64,
    /// Upper bound on a provider call; `0` disables the bound
    pub response_timeout_secs: u64,
    pub search_policy: SearchPolicy,
    /// Connector activation overrides, by connector id
    pub connectors: BTreeMap<String, bool>,
    /// Counter values the session starts from
    pub usage_seed: BTreeMap<Capability, u64>,
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: "claude-4-sonnet".to_string(),
            fallback_name: "Claude 4 Sonnet".to_string(),
            provider: ProviderKind::default(),
            simulated_delay_ms: 1000,
            response_timeout_secs: 30,
            search_policy: SearchPolicy::default(),
            connectors: BTreeMap::new(),
            usage_seed: BTreeMap::new(),
            dark_mode: true,
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join(".mcpchat").join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join(".mcpchat").join("input_history.txt")
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        match self.response_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Loads the config at `path`, or the default location when `None`.
    /// A missing file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Config, ChatError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::default();
        if let Err(e) = config.save(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }
}
