//! Per-level obstacle stream
//!
//! Spawns hazards on a fixed cadence until every per-kind cap is met, tallies
//! each hazard once when it dies, and declares the level complete after a
//! debounce delay.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::obstacle::{FLYING_LANES, Obstacle, ObstacleKind};
use super::state::GameEvent;
use crate::Bounds;
use crate::settings::LevelSettings;

/// Spawn priority, highest first
const PRIORITY: [ObstacleKind; 3] = [
    ObstacleKind::Falling,
    ObstacleKind::Flying,
    ObstacleKind::Ground,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerTuning {
    /// Ticks the completion condition must hold before the level is complete
    pub completion_delay_ticks: u32,
    /// Fraction of all capped hazards that must have passed
    pub pass_ratio: f64,
    /// Falling speed relative to the flying base speed
    pub falling_speed_factor: f64,
    /// Falling hazards start in [min_x_fraction, 1.0] of the screen width
    pub falling_min_x_fraction: f64,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            completion_delay_ticks: 300,
            pass_ratio: 0.9,
            falling_speed_factor: 1.2,
            falling_min_x_fraction: 0.3,
        }
    }
}

/// Cap and progress for one obstacle kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounter {
    pub cap: u32,
    pub spawned: u32,
    pub passed: u32,
}

impl KindCounter {
    fn new(cap: u32) -> Self {
        Self {
            cap,
            ..Default::default()
        }
    }

    pub fn exhausted(&self) -> bool {
        self.spawned >= self.cap
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounters {
    pub ground: KindCounter,
    pub flying: KindCounter,
    pub falling: KindCounter,
}

impl KindCounters {
    pub fn get(&self, kind: ObstacleKind) -> &KindCounter {
        match kind {
            ObstacleKind::Ground => &self.ground,
            ObstacleKind::Flying => &self.flying,
            ObstacleKind::Falling => &self.falling,
        }
    }

    fn get_mut(&mut self, kind: ObstacleKind) -> &mut KindCounter {
        match kind {
            ObstacleKind::Ground => &mut self.ground,
            ObstacleKind::Flying => &mut self.flying,
            ObstacleKind::Falling => &mut self.falling,
        }
    }

    pub fn all_spawned(&self) -> bool {
        self.ground.exhausted() && self.flying.exhausted() && self.falling.exhausted()
    }

    pub fn total_cap(&self) -> u32 {
        self.ground.cap + self.flying.cap + self.falling.cap
    }

    pub fn total_passed(&self) -> u32 {
        self.ground.passed + self.flying.passed + self.falling.passed
    }
}

/// Level completion debounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    Pending,
    /// Condition holding for `elapsed` ticks
    Detected { elapsed: u32 },
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    settings: LevelSettings,
    tuning: SpawnerTuning,
    bounds: Bounds,
    obstacles: Vec<Obstacle>,
    counters: KindCounters,
    spawn_timer: u32,
    completion: Completion,
    next_id: u32,
}

impl Spawner {
    pub fn new(settings: LevelSettings, tuning: SpawnerTuning, bounds: Bounds) -> Self {
        let counters = KindCounters {
            ground: KindCounter::new(settings.counts.ground),
            flying: KindCounter::new(settings.counts.flying),
            falling: KindCounter::new(settings.counts.falling),
        };
        Self {
            settings,
            tuning,
            bounds,
            obstacles: Vec::new(),
            counters,
            spawn_timer: 0,
            completion: Completion::Pending,
            next_id: 1,
        }
    }

    /// Start over with new settings: counters, obstacles and debounce all reset
    pub fn reset(&mut self, settings: LevelSettings) {
        *self = Self::new(settings, self.tuning, self.bounds);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn counters(&self) -> &KindCounters {
        &self.counters
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Complete
    }

    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    /// All caps met and enough hazards passed (or none left on screen)
    pub fn completion_condition(&self) -> bool {
        if !self.counters.all_spawned() {
            return false;
        }
        let needed = self.tuning.pass_ratio * self.counters.total_cap() as f64;
        self.counters.total_passed() as f64 >= needed || self.obstacles.is_empty()
    }

    /// Advance one tick.
    ///
    /// `allow_completion` is false while the player is dead so a lost run is
    /// never reported as a completed level.
    pub fn update(&mut self, rng: &mut SimRng, allow_completion: bool, events: &mut Vec<GameEvent>) {
        match self.completion {
            Completion::Complete => return,
            Completion::Detected { elapsed } => {
                if !self.completion_condition() || !allow_completion {
                    log::debug!("Level completion cancelled after {} ticks", elapsed);
                    self.completion = Completion::Pending;
                } else {
                    let elapsed = elapsed + 1;
                    if elapsed >= self.tuning.completion_delay_ticks {
                        log::info!("Level '{}' complete", self.settings.name);
                        self.completion = Completion::Complete;
                        return;
                    }
                    self.completion = Completion::Detected { elapsed };
                }
            }
            Completion::Pending => {}
        }

        for obstacle in &mut self.obstacles {
            obstacle.update(&self.bounds);
        }

        for obstacle in &mut self.obstacles {
            if obstacle.is_dead() && !obstacle.counted {
                obstacle.counted = true;
                self.counters.get_mut(obstacle.kind).passed += 1;
                events.push(GameEvent::ObstaclePassed { kind: obstacle.kind });
            }
        }
        self.obstacles.retain(|o| !o.is_dead());

        if allow_completion && self.completion == Completion::Pending && self.completion_condition()
        {
            log::info!(
                "Level completion detected ({}/{} passed), waiting {} ticks",
                self.counters.total_passed(),
                self.counters.total_cap(),
                self.tuning.completion_delay_ticks
            );
            self.completion = Completion::Detected { elapsed: 0 };
        }

        self.spawn_timer += 1;
        if self.spawn_timer >= self.settings.spawn_interval {
            self.spawn_timer = 0;
            if !self.counters.all_spawned() {
                if let Some(kind) = self.spawn(rng) {
                    events.push(GameEvent::ObstacleSpawned { kind });
                }
            }
        }
    }

    fn probability(&self, kind: ObstacleKind) -> f64 {
        match kind {
            ObstacleKind::Falling => self.settings.falling_probability,
            ObstacleKind::Flying => self.settings.flying_probability,
            ObstacleKind::Ground => 1.0,
        }
    }

    /// Weighted choice among kinds whose cap is unmet
    pub fn choose_kind(&self, rng: &mut SimRng) -> Option<ObstacleKind> {
        let eligible: Vec<ObstacleKind> = PRIORITY
            .into_iter()
            .filter(|kind| !self.counters.get(*kind).exhausted())
            .collect();

        match eligible.as_slice() {
            [] => None,
            [only] => Some(*only),
            [high, low] => {
                let roll: f64 = rng.random();
                Some(if roll < self.probability(*high) { *high } else { *low })
            }
            _ => {
                let roll: f64 = rng.random();
                let falling = self.settings.falling_probability;
                let flying = self.settings.flying_probability;
                Some(if roll < falling {
                    ObstacleKind::Falling
                } else if roll < falling + flying {
                    ObstacleKind::Flying
                } else {
                    ObstacleKind::Ground
                })
            }
        }
    }

    fn spawn(&mut self, rng: &mut SimRng) -> Option<ObstacleKind> {
        let kind = self.choose_kind(rng)?;
        let id = self.next_id;
        self.next_id += 1;

        let speeds = self.settings.base_speeds;
        let obstacle = match kind {
            ObstacleKind::Ground => Obstacle::ground(id, speeds.ground, &self.bounds),
            ObstacleKind::Flying => {
                let lane = rng.random_range(0..FLYING_LANES.len());
                Obstacle::flying(id, lane, speeds.flying, &self.bounds)
            }
            ObstacleKind::Falling => {
                let min = self.tuning.falling_min_x_fraction;
                let x = self.bounds.width * (min + (1.0 - min) * rng.random::<f64>());
                let speed = speeds.flying * self.tuning.falling_speed_factor;
                Obstacle::falling(id, x, speed, &self.bounds)
            }
        };

        self.counters.get_mut(kind).spawned += 1;
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0})",
            kind.as_str(),
            id,
            obstacle.body.x(),
            obstacle.body.y()
        );
        self.obstacles.push(obstacle);
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ObstacleCounts;
    use rand::SeedableRng;

    fn settings(ground: u32, flying: u32, falling: u32, spawn_interval: u32) -> LevelSettings {
        LevelSettings {
            spawn_interval,
            counts: ObstacleCounts {
                ground,
                flying,
                falling,
            },
            ..LevelSettings::preset(1)
        }
    }

    fn spawner(settings: LevelSettings) -> Spawner {
        Spawner::new(settings, SpawnerTuning::default(), Bounds::default())
    }

    #[test]
    fn test_single_ground_level_completes_after_debounce() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(1, 0, 0, 1));
        let bounds = Bounds::default();

        spawner.update(&mut rng, true, &mut events);
        assert_eq!(spawner.obstacles().len(), 1);
        let cactus = &spawner.obstacles()[0];
        assert_eq!(cactus.kind, ObstacleKind::Ground);
        assert_eq!(cactus.body.x(), bounds.width + 20.0);
        assert!(spawner.counters().all_spawned());

        spawner.obstacles_mut()[0].destroy();
        spawner.update(&mut rng, true, &mut events);
        assert_eq!(spawner.counters().ground.passed, 1);
        assert!(spawner.obstacles().is_empty());
        assert_eq!(spawner.completion(), Completion::Detected { elapsed: 0 });

        for _ in 0..299 {
            spawner.update(&mut rng, true, &mut events);
            assert!(!spawner.is_complete());
        }
        spawner.update(&mut rng, true, &mut events);
        assert!(spawner.is_complete());
        assert_eq!(spawner.counters().ground.passed, 1);
    }

    #[test]
    fn test_passed_counted_exactly_once() {
        let mut rng = SimRng::seed_from_u64(2);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(3, 0, 0, 1));
        for _ in 0..3 {
            spawner.update(&mut rng, true, &mut events);
        }
        for obstacle in spawner.obstacles_mut() {
            obstacle.destroy();
        }
        spawner.update(&mut rng, true, &mut events);
        spawner.update(&mut rng, true, &mut events);
        assert_eq!(spawner.counters().ground.passed, 3);
        let passed_events = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .count();
        assert_eq!(passed_events, 3);
    }

    #[test]
    fn test_cadence_respects_interval() {
        let mut rng = SimRng::seed_from_u64(3);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(5, 0, 0, 10));
        for _ in 0..9 {
            spawner.update(&mut rng, true, &mut events);
        }
        assert!(spawner.obstacles().is_empty());
        spawner.update(&mut rng, true, &mut events);
        assert_eq!(spawner.obstacles().len(), 1);
    }

    #[test]
    fn test_no_completion_while_player_dead() {
        let mut rng = SimRng::seed_from_u64(4);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(0, 0, 0, 1));
        for _ in 0..400 {
            spawner.update(&mut rng, false, &mut events);
        }
        assert_eq!(spawner.completion(), Completion::Pending);
    }

    // Once every cap is met nothing new spawns and the pass tally only grows,
    // so the completion condition itself cannot go false again. A dying
    // player is what cancels a pending completion in play.
    #[test]
    fn test_pending_completion_cancels_when_completion_disallowed() {
        let mut rng = SimRng::seed_from_u64(5);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(0, 0, 0, 1));
        spawner.update(&mut rng, true, &mut events);
        assert!(matches!(spawner.completion(), Completion::Detected { .. }));

        spawner.update(&mut rng, false, &mut events);
        assert_eq!(spawner.completion(), Completion::Pending);
    }

    #[test]
    fn test_choose_kind_single_and_pair() {
        let mut rng = SimRng::seed_from_u64(6);
        let only_flying = spawner(settings(0, 2, 0, 1));
        for _ in 0..20 {
            assert_eq!(only_flying.choose_kind(&mut rng), Some(ObstacleKind::Flying));
        }

        let never_falling = spawner(LevelSettings {
            falling_probability: 0.0,
            ..settings(2, 0, 2, 1)
        });
        for _ in 0..20 {
            assert_eq!(never_falling.choose_kind(&mut rng), Some(ObstacleKind::Ground));
        }

        let always_flying = spawner(LevelSettings {
            flying_probability: 1.0,
            ..settings(2, 2, 0, 1)
        });
        for _ in 0..20 {
            assert_eq!(always_flying.choose_kind(&mut rng), Some(ObstacleKind::Flying));
        }

        assert_eq!(spawner(settings(0, 0, 0, 1)).choose_kind(&mut rng), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut rng = SimRng::seed_from_u64(7);
        let mut events = Vec::new();
        let mut spawner = spawner(settings(2, 2, 2, 1));
        for _ in 0..4 {
            spawner.update(&mut rng, true, &mut events);
        }
        spawner.reset(settings(1, 0, 0, 5));
        assert!(spawner.obstacles().is_empty());
        assert_eq!(spawner.counters().ground, KindCounter::new(1));
        assert_eq!(spawner.counters().flying.cap, 0);
        assert_eq!(spawner.completion(), Completion::Pending);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_caps_reached_never_exceeded(
                ground in 0u32..6,
                flying in 0u32..6,
                falling in 0u32..6,
                seed in any::<u64>(),
            ) {
                let mut rng = SimRng::seed_from_u64(seed);
                let mut events = Vec::new();
                let mut spawner = spawner(settings(ground, flying, falling, 1));
                for _ in 0..(ground + flying + falling + 5) {
                    spawner.update(&mut rng, true, &mut events);
                    let c = spawner.counters();
                    prop_assert!(c.ground.spawned <= ground);
                    prop_assert!(c.flying.spawned <= flying);
                    prop_assert!(c.falling.spawned <= falling);
                }
                let c = spawner.counters();
                prop_assert_eq!(c.ground.spawned, ground);
                prop_assert_eq!(c.flying.spawned, flying);
                prop_assert_eq!(c.falling.spawned, falling);
            }
        }
    }
}
