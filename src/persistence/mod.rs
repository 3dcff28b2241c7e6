//! Settings and high score persistence
//!
//! The simulation only consumes numeric settings and a best score; these
//! stores own where they live:
//! - `MemoryStore`: in-process, used by tests and the headless runner
//! - `JsonFileStore`: one JSON document on disk, rewritten on change

pub mod json_store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::{BestScore, HighScoreStore};
use crate::settings::{BattleSettings, LevelOverrides, LevelSettings};

pub use json_store::JsonFileStore;

/// Source of per-level and battle settings
pub trait SettingsStore {
    /// Settings for `level`, with defaults applied to anything not stored
    fn level_settings(&self, level: u32) -> LevelSettings;

    fn battle_settings(&self) -> BattleSettings;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything a store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredRecord {
    /// Overrides keyed by level id
    pub levels: BTreeMap<u32, LevelOverrides>,
    pub battle: BattleSettings,
    pub best: BestScore,
}

impl StoredRecord {
    fn level_settings(&self, level: u32) -> LevelSettings {
        match self.levels.get(&level) {
            Some(overrides) => LevelSettings::resolve(level, overrides),
            None => LevelSettings::preset(level),
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub record: StoredRecord,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored overrides for one level
    pub fn with_level(mut self, level: u32, overrides: LevelOverrides) -> Self {
        self.record.levels.insert(level, overrides);
        self
    }

    pub fn with_battle(mut self, battle: BattleSettings) -> Self {
        self.record.battle = battle;
        self
    }
}

impl SettingsStore for MemoryStore {
    fn level_settings(&self, level: u32) -> LevelSettings {
        self.record.level_settings(level)
    }

    fn battle_settings(&self) -> BattleSettings {
        self.record.battle.sanitized()
    }
}

impl HighScoreStore for MemoryStore {
    fn high_score(&self) -> u64 {
        self.record.best.score
    }

    fn set_high_score_if_higher(&mut self, score: u64) -> bool {
        self.record.best.set_if_higher(score)
    }
}
