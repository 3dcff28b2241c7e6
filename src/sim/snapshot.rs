//! Read-only views of the simulation for render/audio/HUD consumers

use serde::{Deserialize, Serialize};

use super::actor::{Actor, Combatant};
use super::enemy::AiState;
use super::entity::Facing;
use super::obstacle::ObstacleKind;
use super::spawner::KindCounters;
use super::state::{GameMode, GamePhase, GameState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    pub frame: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub facing: Facing,
    pub health: u32,
    pub max_health: u32,
    pub dead: bool,
    pub jumping: bool,
    pub ducking: bool,
    pub attacking: bool,
    pub invulnerable: bool,
    pub frame: u32,
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl ActorSnapshot {
    fn of(actor: &Actor) -> Self {
        let body = actor.body();
        Self {
            x: body.x(),
            y: body.y(),
            width: body.width(),
            height: body.height(),
            facing: actor.facing(),
            health: actor.health(),
            max_health: actor.max_health(),
            dead: actor.is_dead(),
            jumping: actor.is_jumping(),
            ducking: actor.is_ducking(),
            attacking: actor.is_attacking(),
            invulnerable: actor.is_invulnerable(),
            frame: actor.anim_frame(),
            projectiles: actor
                .projectiles()
                .iter()
                .filter(|p| p.is_active())
                .map(|p| ProjectileSnapshot {
                    x: p.body().x(),
                    y: p.body().y(),
                    facing: p.direction(),
                    frame: p.anim_frame(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: u32,
    pub ai_state: AiState,
    pub actor: ActorSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub level: u32,
    pub mode: GameMode,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub player: ActorSnapshot,
    /// `None` when the budget is unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projectiles_remaining: Option<u32>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub counters: KindCounters,
    pub enemies: Vec<EnemySnapshot>,
    pub enemies_defeated: u32,
    pub enemies_total: u32,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            level: self.level,
            mode: self.mode,
            phase: self.phase,
            score: self.score_points(),
            high_score: self.high_score,
            player: ActorSnapshot::of(self.player.actor()),
            projectiles_remaining: self.player.projectiles_remaining(),
            obstacles: self
                .spawner
                .obstacles()
                .iter()
                .filter(|o| !o.is_dead())
                .map(|o| ObstacleSnapshot {
                    id: o.id,
                    kind: o.kind,
                    x: o.body.x(),
                    y: o.body.y(),
                    width: o.body.width(),
                    height: o.body.height(),
                })
                .collect(),
            counters: *self.spawner.counters(),
            enemies: self
                .encounter
                .enemies()
                .iter()
                .map(|e| EnemySnapshot {
                    id: e.id,
                    ai_state: e.ai_state(),
                    actor: ActorSnapshot::of(e.actor()),
                })
                .collect(),
            enemies_defeated: self.encounter.defeated(),
            enemies_total: self.encounter.max_enemies(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BATTLE_LEVEL, BattleSettings, LevelSettings};

    #[test]
    fn test_snapshot_reflects_state() {
        let state = GameState::new(
            3,
            BATTLE_LEVEL,
            LevelSettings::preset(BATTLE_LEVEL),
            BattleSettings::default(),
            42,
        );
        let snap = state.snapshot();
        assert_eq!(snap.mode, GameMode::Battle);
        assert_eq!(snap.high_score, 42);
        assert_eq!(snap.player.health, 100);
        assert_eq!(snap.projectiles_remaining, None);
        assert_eq!(snap.enemies.len(), 1);
        assert_eq!(snap.enemies_total, 3);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let state = GameState::new(3, 1, LevelSettings::preset(1), BattleSettings::default(), 0);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"projectiles_remaining\":3"));
    }
}
