//! Client-local persisted configuration.
//!
//! A single record keyed by a fixed name, read once on player-session start
//! and rewritten whenever keywords change during playback. Accessed from one
//! thread; no concurrent writers are assumed.

use std::path::{Path, PathBuf};

use podcast_types::PodcastConfig;

/// Fixed key under which the configuration record is stored.
pub const CONFIG_KEY: &str = "podcast.config";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access config store: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored config is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// A store rooted at `dir`; the record lives at `<dir>/podcast.config.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CONFIG_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored configuration, `None` when nothing was saved yet.
    pub fn load(&self) -> Result<Option<PodcastConfig>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, config: &PodcastConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(config)?)?;
        Ok(())
    }

    /// Removes a keyword from the live config and immediately re-persists.
    pub fn remove_keyword(
        &self,
        config: &mut PodcastConfig,
        keyword: &str,
    ) -> Result<(), StoreError> {
        config.remove_keyword(keyword);
        self.save(config)
    }
}
