//! Level and battle settings
//!
//! Read-only to the simulation. Every field has a documented default so a
//! partial or missing record never stops a level from starting.

use serde::{Deserialize, Serialize};

/// Level that runs in battle mode (enemies instead of obstacles)
pub const BATTLE_LEVEL: u32 = 2;
/// Highest level id
pub const LAST_LEVEL: u32 = 2;

/// Per-kind obstacle speeds (pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSpeeds {
    pub ground: f64,
    pub flying: f64,
}

impl Default for BaseSpeeds {
    fn default() -> Self {
        Self {
            ground: 4.0,
            flying: 5.0,
        }
    }
}

/// Per-kind obstacle caps for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleCounts {
    pub ground: u32,
    pub flying: u32,
    pub falling: u32,
}

impl Default for ObstacleCounts {
    fn default() -> Self {
        Self {
            ground: 1,
            flying: 1,
            falling: 1,
        }
    }
}

impl ObstacleCounts {
    pub fn total(&self) -> u32 {
        self.ground + self.flying + self.falling
    }
}

/// Obstacle stream and projectile budget for one level.
///
/// Missing fields deserialize to the level 1 preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub name: String,
    /// Ticks between spawn attempts
    pub spawn_interval: u32,
    pub base_speeds: BaseSpeeds,
    pub flying_probability: f64,
    pub falling_probability: f64,
    pub counts: ObstacleCounts,
    /// Projectiles the player may launch in this level (ignored in battle mode)
    pub max_projectiles: u32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self::preset(1)
    }
}

impl LevelSettings {
    /// Built-in defaults for a level id
    pub fn preset(level: u32) -> Self {
        if level == 1 {
            Self {
                name: "Easy".to_string(),
                spawn_interval: 120,
                base_speeds: BaseSpeeds::default(),
                flying_probability: 0.3,
                falling_probability: 0.2,
                counts: ObstacleCounts::default(),
                max_projectiles: 3,
            }
        } else {
            Self {
                name: "Battle".to_string(),
                spawn_interval: 80,
                base_speeds: BaseSpeeds {
                    ground: 6.0,
                    flying: 7.0,
                },
                flying_probability: 0.5,
                falling_probability: 0.3,
                counts: ObstacleCounts {
                    ground: 15,
                    flying: 15,
                    falling: 15,
                },
                max_projectiles: 5,
            }
        }
    }

    /// Apply stored overrides on top of the preset for `level`
    pub fn resolve(level: u32, overrides: &LevelOverrides) -> Self {
        let preset = Self::preset(level);
        Self {
            name: overrides.name.clone().unwrap_or(preset.name),
            spawn_interval: overrides.spawn_interval.unwrap_or(preset.spawn_interval),
            base_speeds: BaseSpeeds {
                ground: overrides.ground_speed.unwrap_or(preset.base_speeds.ground),
                flying: overrides.flying_speed.unwrap_or(preset.base_speeds.flying),
            },
            flying_probability: overrides
                .flying_probability
                .unwrap_or(preset.flying_probability),
            falling_probability: overrides
                .falling_probability
                .unwrap_or(preset.falling_probability),
            counts: ObstacleCounts {
                ground: overrides.ground_count.unwrap_or(preset.counts.ground),
                flying: overrides.flying_count.unwrap_or(preset.counts.flying),
                falling: overrides.falling_count.unwrap_or(preset.counts.falling),
            },
            max_projectiles: overrides.max_projectiles.unwrap_or(preset.max_projectiles),
        }
        .sanitized(level)
    }

    /// Force interval/speeds positive and probabilities into [0, 1]
    pub fn sanitized(mut self, level: u32) -> Self {
        let preset = Self::preset(level);
        if self.spawn_interval == 0 {
            log::warn!("Level {} spawn interval is 0, using {}", level, preset.spawn_interval);
            self.spawn_interval = preset.spawn_interval;
        }
        if !(self.base_speeds.ground > 0.0) {
            log::warn!("Level {} ground speed invalid, using default", level);
            self.base_speeds.ground = preset.base_speeds.ground;
        }
        if !(self.base_speeds.flying > 0.0) {
            log::warn!("Level {} flying speed invalid, using default", level);
            self.base_speeds.flying = preset.base_speeds.flying;
        }
        self.flying_probability = clamp_probability(self.flying_probability);
        self.falling_probability = clamp_probability(self.falling_probability);
        self
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Optional per-field overrides as stored by a settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelOverrides {
    pub name: Option<String>,
    pub spawn_interval: Option<u32>,
    pub ground_speed: Option<f64>,
    pub flying_speed: Option<f64>,
    pub flying_probability: Option<f64>,
    pub falling_probability: Option<f64>,
    pub ground_count: Option<u32>,
    pub flying_count: Option<u32>,
    pub falling_count: Option<u32>,
    pub max_projectiles: Option<u32>,
}

/// Enemy population and damage for battle mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSettings {
    pub enemy_count: u32,
    pub enemy_health: u32,
    /// Contact damage an attacking enemy deals
    pub enemy_damage: u32,
    /// Damage of one enemy projectile
    pub enemy_fire_damage: u32,
    /// Damage of one player projectile against an enemy
    pub player_fire_damage: u32,
    /// Ticks between enemy spawns
    pub spawn_interval: u32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            enemy_count: 3,
            enemy_health: 100,
            enemy_damage: 20,
            enemy_fire_damage: 15,
            player_fire_damage: 25,
            spawn_interval: 300,
        }
    }
}

impl BattleSettings {
    /// Replace a zero spawn interval or enemy health with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.spawn_interval == 0 {
            log::warn!("Battle spawn interval is 0, using {}", defaults.spawn_interval);
            self.spawn_interval = defaults.spawn_interval;
        }
        if self.enemy_health == 0 {
            log::warn!("Battle enemy health is 0, using {}", defaults.enemy_health);
            self.enemy_health = defaults.enemy_health;
        }
        self
    }
}
