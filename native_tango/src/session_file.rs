use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SESSION_FILE_NAME: &str = "tango_session.toml";

/// Identity kept between runs so reconnecting reuses the same player.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionInfo {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub player_id: Option<u64>,
}

impl SessionInfo {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading session file '{}'", path.display()))?;
            let info = toml::from_str(&text)
                .with_context(|| format!("parsing session file '{}'", path.display()))?;
            Ok(info)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("creating session directory '{}'", parent.display())
                })?;
            }
        }
        let text = toml::to_string_pretty(self).with_context(|| "serializing session info")?;
        fs::write(path, text)
            .with_context(|| format!("writing session file '{}'", path.display()))?;
        Ok(())
    }

    /// Record the identity handed out by the service, saving only on change.
    pub fn remember(path: &Path, session_id: &str, player_id: u64) -> Result<Self> {
        let mut info = Self::load(path)?;
        let fresh = SessionInfo {
            session_id: Some(session_id.to_string()),
            player_id: Some(player_id),
        };
        if info != fresh {
            info = fresh;
            info.save(path)?;
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("tango-session-{}", std::process::id()));
        let path = dir.join(SESSION_FILE_NAME);
        assert_eq!(SessionInfo::load(&path).unwrap(), SessionInfo::default());

        SessionInfo::remember(&path, "abc", 4).unwrap();
        let loaded = SessionInfo::load(&path).unwrap();
        assert_eq!(loaded.session_id.as_deref(), Some("abc"));
        assert_eq!(loaded.player_id, Some(4));
        let _ = fs::remove_dir_all(&dir);
    }
}
