//! Best score persistence
//!
//! A single scalar under one key. Persisted to LocalStorage in the browser,
//! kept in memory elsewhere.

use crate::error::StorageError;

/// LocalStorage key of the best score
pub const STORAGE_KEY: &str = "toothRacerHighScore";

/// Storage for the best score
pub trait ScoreStore {
    /// Stored best score, `0.0` when nothing was saved yet
    fn load(&self) -> Result<f32, StorageError>;

    fn save(&mut self, score: f32) -> Result<(), StorageError>;
}

/// Parse a stored decimal string
pub fn parse_score(raw: &str) -> Result<f32, StorageError> {
    match raw.trim().parse::<f32>() {
        Ok(score) if score.is_finite() && score >= 0.0 => Ok(score),
        _ => Err(StorageError::Corrupt(raw.to_string())),
    }
}

/// Read the best score, falling back to `0.0` when the store fails
pub fn load_high_score<K: ScoreStore + ?Sized>(store: &K) -> f32 {
    match store.load() {
        Ok(score) => {
            log::info!("Loaded high score {:.0}", score);
            score
        }
        Err(e) => {
            log::warn!("High score unavailable ({}), starting from 0", e);
            0.0
        }
    }
}

/// Session-only store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw stored value
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Some(raw.into()),
        }
    }

    /// Raw stored value, as it would appear in LocalStorage
    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<f32, StorageError> {
        self.value.as_deref().map_or(Ok(0.0), parse_score)
    }

    fn save(&mut self, score: f32) -> Result<(), StorageError> {
        self.value = Some(score.to_string());
        Ok(())
    }
}

/// Best score in the browser's LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<f32, StorageError> {
        let raw = Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(|e| StorageError::Read(format!("{:?}", e)))?;
        raw.as_deref().map_or(Ok(0.0), parse_score)
    }

    fn save(&mut self, score: f32) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(STORAGE_KEY, &score.to_string())
            .map_err(|e| StorageError::Write(format!("{:?}", e)))?;
        log::info!("High score saved ({:.0})", score);
        Ok(())
    }
}
