//! Battle-mode enemy population
//!
//! Population-capped: at most `enemy_count` enemies are ever spawned per level,
//! and the level is won once all of them have died and finished animating.

use super::SimRng;
use super::actor::Combatant;
use super::enemy::EnemyActor;
use super::state::GameEvent;
use crate::Bounds;
use crate::settings::BattleSettings;

/// Enemies appear at this fraction of the screen width
pub const ENEMY_SPAWN_X_FRACTION: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct EncounterManager {
    settings: BattleSettings,
    bounds: Bounds,
    enemies: Vec<EnemyActor>,
    defeated: u32,
    spawn_timer: u32,
    next_id: u32,
}

impl EncounterManager {
    pub fn new(settings: BattleSettings, bounds: Bounds) -> Self {
        Self {
            settings,
            bounds,
            enemies: Vec::new(),
            defeated: 0,
            spawn_timer: 0,
            next_id: 1,
        }
    }

    /// Enter battle: the first enemy appears immediately
    pub fn start(&mut self, events: &mut Vec<GameEvent>) {
        if self.enemies.is_empty() && self.defeated == 0 && self.can_spawn() {
            self.spawn(events);
        }
    }

    /// Drop all enemies and counters and take new settings
    pub fn reset(&mut self, settings: BattleSettings) {
        *self = Self::new(settings, self.bounds);
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    pub fn enemies(&self) -> &[EnemyActor] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [EnemyActor] {
        &mut self.enemies
    }

    pub fn defeated(&self) -> u32 {
        self.defeated
    }

    pub fn max_enemies(&self) -> u32 {
        self.settings.enemy_count
    }

    pub fn all_defeated(&self) -> bool {
        self.defeated >= self.settings.enemy_count && self.enemies.is_empty()
    }

    fn can_spawn(&self) -> bool {
        let active = self.enemies.len() as u32;
        active < self.settings.enemy_count && self.defeated + active < self.settings.enemy_count
    }

    fn spawn(&mut self, events: &mut Vec<GameEvent>) {
        let id = self.next_id;
        self.next_id += 1;
        let x = (self.bounds.width * ENEMY_SPAWN_X_FRACTION).floor();
        let enemy = EnemyActor::new(
            id,
            x,
            self.settings.enemy_health,
            self.settings.enemy_damage,
            self.settings.enemy_fire_damage,
            self.bounds,
        );
        log::debug!(
            "Spawned enemy #{} at x={} ({} active, {} defeated)",
            id,
            x,
            self.enemies.len() + 1,
            self.defeated
        );
        self.enemies.push(enemy);
        events.push(GameEvent::EnemySpawned { id });
    }

    /// Advance one tick with the player at `target_x`
    pub fn update(&mut self, target_x: f64, rng: &mut SimRng, events: &mut Vec<GameEvent>) {
        if self.enemies.is_empty() && self.defeated == 0 {
            self.start(events);
        }

        for enemy in &mut self.enemies {
            if enemy.update(target_x, rng) {
                events.push(GameEvent::ProjectileLaunched { by_player: false });
            }
        }

        let before = self.enemies.len();
        self.enemies.retain(|enemy| {
            let finished = enemy.actor().death_animation_complete();
            if finished {
                log::info!("Enemy #{} defeated", enemy.id);
                events.push(GameEvent::EnemyDefeated { id: enemy.id });
            }
            !finished
        });
        self.defeated += (before - self.enemies.len()) as u32;

        self.spawn_timer += 1;
        if self.spawn_timer >= self.settings.spawn_interval && self.can_spawn() {
            self.spawn(events);
            self.spawn_timer = 0;
        }
    }
}
