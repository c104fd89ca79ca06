//! Progression persistence
//!
//! The only state that outlives a level session: the highest unlocked level.
//! Stores are injected behind [`ProgressionStore`] so tests and the native
//! runner can swap the backend.
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and demos
//! - `JsonFileStore`: JSON file with tmp-then-rename writes (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

/// Storage key for the highest unlocked level
pub const UNLOCKED_LEVEL_KEY: &str = "gucci_unlocked_level";

/// Value reported when nothing has been stored yet
pub const DEFAULT_UNLOCKED_LEVEL: u8 = 1;

/// Storage failures. Reads never fail (they fall back to the default);
/// writes report what went wrong.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persisted "highest unlocked level" counter
pub trait ProgressionStore: std::fmt::Debug {
    /// Highest unlocked level, `DEFAULT_UNLOCKED_LEVEL` if never written
    fn unlocked_level(&self) -> u8;

    /// Overwrite the stored value
    fn set_unlocked_level(&mut self, level: u8) -> Result<(), StoreError>;
}

/// Read-modify-write after completing `completed`: unlock the following level
/// if that raises the stored value. Returns whether anything was written.
pub fn record_completion(
    store: &mut dyn ProgressionStore,
    completed: u8,
) -> Result<bool, StoreError> {
    let candidate = completed.saturating_add(1);
    let current = store.unlocked_level();
    if candidate <= current {
        return Ok(false);
    }
    store.set_unlocked_level(candidate)?;
    log::info!("Unlocked level {} (was {})", candidate, current);
    Ok(true)
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    unlocked: Option<u8>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a value
    pub fn with_unlocked(level: u8) -> Self {
        Self {
            unlocked: Some(level),
            writes: 0,
        }
    }

    /// Number of writes performed
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl ProgressionStore for MemoryStore {
    fn unlocked_level(&self) -> u8 {
        self.unlocked.unwrap_or(DEFAULT_UNLOCKED_LEVEL)
    }

    fn set_unlocked_level(&mut self, level: u8) -> Result<(), StoreError> {
        self.unlocked = Some(level);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_to_first_level() {
        assert_eq!(MemoryStore::new().unlocked_level(), 1);
    }

    #[test]
    fn test_completion_only_raises() {
        let mut store = MemoryStore::new();
        assert!(record_completion(&mut store, 1).unwrap());
        assert_eq!(store.unlocked_level(), 2);

        let mut store = MemoryStore::with_unlocked(4);
        assert!(!record_completion(&mut store, 2).unwrap());
        assert!(!record_completion(&mut store, 3).unwrap());
        assert_eq!(store.unlocked_level(), 4);
        assert_eq!(store.writes(), 0);

        assert!(record_completion(&mut store, 4).unwrap());
        assert_eq!(store.unlocked_level(), 5);
    }

    proptest! {
        #[test]
        fn prop_unlocked_level_is_monotonic(completions in prop::collection::vec(1u8..=5, 0..50)) {
            let mut store = MemoryStore::new();
            let mut best = store.unlocked_level();
            for level in completions {
                record_completion(&mut store, level).unwrap();
                let now = store.unlocked_level();
                prop_assert!(now >= best);
                prop_assert!(now >= level + 1);
                best = now;
            }
        }
    }
}
