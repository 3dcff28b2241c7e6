//! JSON file store
//!
//! The whole record is one JSON document. A missing file starts from defaults;
//! an unreadable or corrupt file also starts from defaults (with a warning)
//! when opened through `load_or_default`.

use std::fs;
use std::path::{Path, PathBuf};

use super::{SettingsStore, StoreError, StoredRecord};
use crate::highscores::HighScoreStore;
use crate::settings::{BattleSettings, LevelSettings};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    record: StoredRecord,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file yields the default record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let record = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            StoredRecord::default()
        };
        Ok(Self { path, record })
    }

    /// Open the store, falling back to defaults if the file cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(store) => {
                log::info!("Loaded settings from {}", path.display());
                store
            }
            Err(err) => {
                log::warn!("Using default settings, {} unreadable: {}", path.display(), err);
                Self {
                    path: path.to_path_buf(),
                    record: StoredRecord::default(),
                }
            }
        }
    }

    pub fn record(&self) -> &StoredRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut StoredRecord {
        &mut self.record
    }

    /// Write the record, replacing the file via a temporary sibling
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn level_settings(&self, level: u32) -> LevelSettings {
        self.record.level_settings(level)
    }

    fn battle_settings(&self) -> BattleSettings {
        self.record.battle.sanitized()
    }
}

impl HighScoreStore for JsonFileStore {
    fn high_score(&self) -> u64 {
        self.record.best.score
    }

    fn set_high_score_if_higher(&mut self, score: u64) -> bool {
        if !self.record.best.set_if_higher(score) {
            return false;
        }
        if let Err(err) = self.save() {
            log::warn!("High score {} not saved: {}", score, err);
        }
        true
    }
}
