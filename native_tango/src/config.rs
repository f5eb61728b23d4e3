use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "tango.toml";

/// Client configuration persisted as TOML.
///
/// Fields:
/// - server_url: websocket endpoint of the table server
/// - api_url: base URL of the identity HTTP service
/// - username: name to register with, if any
/// - session_file: where the session id is kept between runs
/// - clock_interval_ms: refresh period of the local countdown
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub api_url: String,
    pub username: Option<String>,
    pub session_file: PathBuf,
    pub clock_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: "ws://localhost:5000/ws".into(),
            api_url: "http://localhost:5000".into(),
            username: None,
            session_file: PathBuf::from(crate::session_file::SESSION_FILE_NAME),
            clock_interval_ms: 10,
        }
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with defaults and return them.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            let cfg = Config::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Save the current config back to `path` (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text =
            toml::to_string_pretty(self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms.max(1))
    }

    /// Session file location, relative paths resolved next to the config file.
    pub fn session_path(&self, config_path: &Path) -> PathBuf {
        if self.session_file.is_absolute() {
            return self.session_file.clone();
        }
        match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(&self.session_file),
            _ => self.session_file.clone(),
        }
    }
}
