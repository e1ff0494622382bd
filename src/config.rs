//! Layered settings: defaults, TOML file, environment, CLI flags

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use roadgraph_core::RoadPolicy;
use serde::Deserialize;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "roadgraph.toml";

/// Contents of a settings file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub policy: Option<RoadPolicy>,
    pub path_timeout_ms: Option<u64>,
    pub seed: Option<PathBuf>,
}

impl FileSettings {
    /// Read `path` if given (it must exist), else `roadgraph.toml` if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(FileSettings::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read settings file {}", path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Values passed on the command line or through `ROADGRAPH_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub policy: Option<RoadPolicy>,
    pub path_timeout_ms: Option<u64>,
    pub seed: Option<PathBuf>,
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub policy: RoadPolicy,
    pub path_timeout: Duration,
    pub seed: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: "127.0.0.1".to_string(),
            port: 5000,
            policy: RoadPolicy::Symmetric,
            path_timeout: Duration::from_millis(2000),
            seed: None,
        }
    }
}

impl Settings {
    /// Overrides win over the file, the file wins over defaults.
    pub fn resolve(file: FileSettings, overrides: Overrides) -> Self {
        let defaults = Settings::default();
        Settings {
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            policy: overrides.policy.or(file.policy).unwrap_or(defaults.policy),
            path_timeout: overrides
                .path_timeout_ms
                .or(file.path_timeout_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.path_timeout),
            seed: overrides.seed.or(file.seed),
        }
    }
}
