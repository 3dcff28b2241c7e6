//! Game state and core simulation types
//!
//! Everything a level needs lives in one `GameState`; restarting a level means
//! building a new one.

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::encounter::EncounterManager;
use super::obstacle::ObstacleKind;
use super::player::{FireBudget, PlayerActor};
use super::spawner::{Spawner, SpawnerTuning};
use crate::Bounds;
use crate::settings::{BATTLE_LEVEL, BattleSettings, LevelSettings};

/// Which kind of opposition a level uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Obstacle stream, limited projectiles
    Run,
    /// Enemy population, unlimited projectiles
    Battle,
}

impl GameMode {
    pub fn for_level(level: u32) -> Self {
        if level == BATTLE_LEVEL {
            GameMode::Battle
        } else {
            GameMode::Run
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level won; waiting for the session to advance
    LevelComplete,
    /// Player died and the death animation finished
    GameOver,
}

/// Something observable happened this tick (consumed by audio/render)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { kind: ObstacleKind },
    /// Hazard retired and tallied (off-screen or destroyed)
    ObstaclePassed { kind: ObstacleKind },
    ObstacleDestroyed { kind: ObstacleKind },
    ProjectileLaunched { by_player: bool },
    PlayerHit { damage: u32 },
    PlayerKilled,
    EnemySpawned { id: u32 },
    EnemyHit { id: u32, killed: bool },
    EnemyDefeated { id: u32 },
    LevelComplete,
    GameOver,
    NewHighScore { score: u64 },
}

/// Complete state of one level attempt
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub level: u32,
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Simulation tick counter (advances only while playing)
    pub time_ticks: u64,
    /// `SCORE_PER_TICK` per playing tick; whole points are shown
    pub score: f64,
    /// Best score known to this state, raised as the run beats it
    pub high_score: u64,
    /// Set once this attempt has beaten the starting high score
    pub new_high_score: bool,
    pub player: PlayerActor,
    pub spawner: Spawner,
    pub encounter: EncounterManager,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    pub bounds: Bounds,
    pub(crate) rng: SimRng,
}

impl GameState {
    /// Create a fresh level attempt with the given seed
    pub fn new(
        seed: u64,
        level: u32,
        level_settings: LevelSettings,
        battle_settings: BattleSettings,
        high_score: u64,
    ) -> Self {
        Self::with_bounds(
            seed,
            level,
            level_settings,
            battle_settings,
            high_score,
            Bounds::default(),
        )
    }

    pub fn with_bounds(
        seed: u64,
        level: u32,
        level_settings: LevelSettings,
        battle_settings: BattleSettings,
        high_score: u64,
        bounds: Bounds,
    ) -> Self {
        let mode = GameMode::for_level(level);
        let budget = match mode {
            GameMode::Battle => FireBudget::Unlimited,
            GameMode::Run => FireBudget::Limited(level_settings.max_projectiles),
        };

        log::info!(
            "Starting level {} '{}' ({:?}) with seed {}",
            level,
            level_settings.name,
            mode,
            seed
        );

        let mut state = Self {
            seed,
            level,
            mode,
            phase: GamePhase::Playing,
            time_ticks: 0,
            score: 0.0,
            high_score,
            new_high_score: false,
            player: PlayerActor::new(budget, bounds),
            spawner: Spawner::new(level_settings, SpawnerTuning::default(), bounds),
            encounter: EncounterManager::new(battle_settings, bounds),
            events: Vec::new(),
            bounds,
            rng: SimRng::seed_from_u64(seed),
        };

        if mode == GameMode::Battle {
            state.encounter.start(&mut state.events);
        }
        state
    }

    /// Whole points scored so far
    pub fn score_points(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::LevelComplete | GamePhase::GameOver)
    }
}
