//! Browser LocalStorage backend (wasm32)

use super::{DEFAULT_UNLOCKED_LEVEL, ProgressionStore, StoreError, UNLOCKED_LEVEL_KEY};

/// Progress kept under `UNLOCKED_LEVEL_KEY` in LocalStorage
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl ProgressionStore for LocalStorageStore {
    fn unlocked_level(&self) -> u8 {
        Self::storage()
            .and_then(|s| s.get_item(UNLOCKED_LEVEL_KEY).ok().flatten())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_UNLOCKED_LEVEL)
    }

    fn set_unlocked_level(&mut self, level: u8) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))?;
        storage
            .set_item(UNLOCKED_LEVEL_KEY, &level.to_string())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        log::info!("Progress saved (level {} unlocked)", level);
        Ok(())
    }
}
