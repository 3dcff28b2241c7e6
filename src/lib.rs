//! Dino Dash - a side-scrolling runner and battle arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, obstacles, enemies, collisions)
//! - `settings`: Level and battle tuning with documented defaults
//! - `highscores`: Best score tracking
//! - `persistence`: Settings/high score stores (memory and JSON file)
//! - `input`: Key event to per-tick action mapping
//! - `session`: Fixed-step driver tying the simulation to its stores

pub mod highscores;
pub mod input;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{BestScore, HighScoreStore};
pub use settings::{BattleSettings, LevelSettings};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: f64 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;
    /// Ground line (actors stand with their bottom edge here)
    pub const GROUND_Y: f64 = SCREEN_HEIGHT - 30.0;

    /// Player start
    pub const PLAYER_START_X: f64 = 100.0;

    /// Score gained per active tick
    pub const SCORE_PER_TICK: f64 = 0.1;
}

/// Screen bounds handed to components that clamp or retire against the edges
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    pub ground_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: consts::SCREEN_WIDTH,
            height: consts::SCREEN_HEIGHT,
            ground_y: consts::GROUND_Y,
        }
    }
}
