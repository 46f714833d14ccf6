//! Configuration persistence.
//!
//! The configuration lives in a single JSON file read on every request
//! and rewritten on every save — last write wins, no in-memory copy to
//! drift out of sync. Unreadable or unparsable files degrade to the
//! defaults with a warning instead of taking the server down.

use std::io;
use std::path::{Path, PathBuf};

use crate::models::AppConfig;

/// Load/save handle for the persisted [`AppConfig`].
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default configuration if no file exists yet.
    pub fn init(&self) -> io::Result<()> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Creating default config");
            self.save(&AppConfig::default())?;
        }
        Ok(())
    }

    /// Read the configuration, merging missing fields with defaults.
    /// Falls back to the full defaults when the file is missing or broken.
    pub fn load(&self) -> AppConfig {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), %e, "Failed to parse config, using defaults");
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), %e, "Failed to read config, using defaults");
                AppConfig::default()
            }
        }
    }

    /// Persist the configuration as pretty-printed JSON.
    pub fn save(&self, config: &AppConfig) -> io::Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutputFormat, SourceMode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load(), AppConfig::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.mode = SourceMode::Url;
        config.url = Some("https://example.com/dashboard".to_string());
        config.format = OutputFormat::Bwr;
        config.bwr_dither = true;

        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = ConfigStore::new(path);
        assert_eq!(store.load(), AppConfig::default());
    }

    #[test]
    fn test_init_creates_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(path.clone());

        store.init().unwrap();
        assert!(path.exists());

        // A second init must not clobber saved state.
        let mut config = AppConfig::default();
        config.sharpen = 2.0;
        store.save(&config).unwrap();
        store.init().unwrap();
        assert_eq!(store.load(), config);
    }
}
