//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one generator, owned by `GameState`)
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod actor;
pub mod collision;
pub mod encounter;
pub mod enemy;
pub mod entity;
pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

/// Random source for every simulation roll
pub type SimRng = rand_pcg::Pcg32;

pub use actor::{Actor, ActorTuning, AttackPhase, Combatant, DamageOutcome, Life, Locomotion};
pub use encounter::EncounterManager;
pub use enemy::{AiState, EnemyActor, EnemyBrain, Intent, TacticalBrain, TargetView};
pub use entity::{Aabb, Entity, Facing};
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::{FireBudget, PlayerActor};
pub use projectile::{Projectile, ProjectileTuning};
pub use snapshot::Snapshot;
pub use spawner::{Completion, KindCounters, Spawner, SpawnerTuning};
pub use state::{GameEvent, GameMode, GamePhase, GameState};
pub use tick::{TickInput, tick};
