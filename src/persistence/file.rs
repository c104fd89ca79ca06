//! JSON file backend (native)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DEFAULT_UNLOCKED_LEVEL, ProgressionStore, StoreError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProgressFile {
    #[serde(rename = "gucci_unlocked_level", default)]
    unlocked_level: Option<u8>,
}

/// Progress kept in a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    data: ProgressFile,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. Unreadable or corrupt
    /// files start fresh with a warning.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt progress file {}: {}", path.display(), e);
                ProgressFile::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ProgressFile::default(),
            Err(e) => {
                log::warn!("Could not read progress file {}: {}", path.display(), e);
                ProgressFile::default()
            }
        };
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProgressionStore for JsonFileStore {
    fn unlocked_level(&self) -> u8 {
        self.data.unlocked_level.unwrap_or(DEFAULT_UNLOCKED_LEVEL)
    }

    fn set_unlocked_level(&mut self, level: u8) -> Result<(), StoreError> {
        let previous = self.data.unlocked_level.replace(level);
        if let Err(e) = self.flush() {
            self.data.unlocked_level = previous;
            return Err(e);
        }
        log::debug!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::record_completion;

    #[test]
    fn test_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.unlocked_level(), 1);
        assert!(record_completion(&mut store, 2).unwrap());

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.unlocked_level(), 3);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("gucci_unlocked_level"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.unlocked_level(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert!(store.set_unlocked_level(4).is_err());
        assert_eq!(store.unlocked_level(), 1);
    }
}
