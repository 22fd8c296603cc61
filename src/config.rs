use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "tally";

/// Store-level configuration persisted alongside the data it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory holding the collection containers.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Resolves the data directory: explicit override, else the platform
    /// data dir, else the current directory.
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        let data_dir = override_dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        });
        Self { data_dir }
    }

    /// Loads a previously saved config under the resolved directory,
    /// falling back to the resolved default when none exists.
    pub fn load_or_default(override_dir: Option<PathBuf>) -> Result<Self> {
        let resolved = Self::resolve(override_dir);
        let path = resolved.config_path();
        if path.exists() {
            let data = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(resolved)
        }
    }

    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(self.config_path(), json)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_override_wins() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/elsewhere")));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::resolve(Some(temp.path().join("store")));
        config.save().expect("save config");

        let loaded =
            StoreConfig::load_or_default(Some(temp.path().join("store"))).expect("load config");
        assert_eq!(loaded.data_dir, config.data_dir);
    }
}
