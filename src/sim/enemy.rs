//! AI-driven enemy actors
//!
//! The decision loop lives in an `EnemyBrain` strategy held by each enemy.
//! The brain only sees where the target is and answers with `Intent`s; the
//! enemy applies those through the same actor operations the player uses.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::actor::{Actor, ActorTuning, Combatant};
use super::entity::Facing;
use crate::Bounds;

/// Tactical state of the decision loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Approach,
    Attack,
    Retreat,
}

/// One action requested by a brain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Face(Facing),
    MoveForward,
    MoveBack,
    Attack,
    Jump,
}

/// What the brain knows about its target on a given tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    /// Enemy x minus target x (positive: target is to the left)
    pub offset: f64,
}

/// Decision-making strategy for an enemy
pub trait EnemyBrain: fmt::Debug {
    fn ai_state(&self) -> AiState;

    /// Advance one tick; returns the intents to apply this tick
    fn tick(&mut self, target: TargetView, rng: &mut SimRng) -> Vec<Intent>;

    fn clone_box(&self) -> Box<dyn EnemyBrain>;
}

impl Clone for Box<dyn EnemyBrain> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Distance beyond which Approach keeps closing in
pub const APPROACH_RANGE: f64 = 150.0;
/// Attack is attempted inside this range
pub const ATTACK_RANGE: f64 = 350.0;
/// Attack backs off inside this distance
pub const TOO_CLOSE: f64 = 100.0;
/// Attack closes in beyond this distance
pub const TOO_FAR: f64 = 250.0;
/// Retreat stops once this far away
pub const RETREAT_RANGE: f64 = 300.0;

/// Ticks between think passes
pub const THINK_INTERVAL: u32 = 30;
/// Chance per think pass of a random jump
pub const JUMP_CHANCE: f64 = 0.02;

/// Approach / Attack / Retreat brain with weighted state reselection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalBrain {
    state: AiState,
    state_timer: u32,
    state_duration: u32,
    think_timer: u32,
    think_interval: u32,
}

impl Default for TacticalBrain {
    fn default() -> Self {
        Self {
            state: AiState::Approach,
            state_timer: 0,
            state_duration: 120,
            think_timer: 0,
            think_interval: THINK_INTERVAL,
        }
    }
}

impl TacticalBrain {
    pub fn state_duration(&self) -> u32 {
        self.state_duration
    }

    /// Switch state with a fresh randomized duration
    fn enter(&mut self, state: AiState, rng: &mut SimRng) {
        self.state = state;
        self.state_timer = 0;
        self.state_duration = match state {
            AiState::Attack => rng.random_range(60..=120),
            AiState::Retreat => rng.random_range(30..=90),
            AiState::Approach => rng.random_range(90..=180),
        };
        log::debug!("Enemy AI -> {:?} for {} ticks", state, self.state_duration);
    }

    /// Weighted reselection once the state's duration has run out
    fn reselect(&mut self, rng: &mut SimRng) {
        let roll: f64 = rng.random();
        let next = match self.state {
            AiState::Approach => {
                if roll < 0.8 {
                    AiState::Attack
                } else {
                    AiState::Retreat
                }
            }
            AiState::Attack => {
                if roll < 0.3 {
                    AiState::Attack
                } else if roll < 0.7 {
                    AiState::Approach
                } else {
                    AiState::Retreat
                }
            }
            AiState::Retreat => {
                if roll < 0.7 {
                    AiState::Approach
                } else {
                    AiState::Attack
                }
            }
        };
        self.enter(next, rng);
    }

    fn think(&mut self, target: TargetView, rng: &mut SimRng) -> Vec<Intent> {
        let offset = target.offset;
        let distance = offset.abs();
        let toward = if offset > 0.0 {
            Intent::MoveBack
        } else {
            Intent::MoveForward
        };
        let away = if offset > 0.0 {
            Intent::MoveForward
        } else {
            Intent::MoveBack
        };

        let mut intents = vec![Intent::Face(Facing::toward(-offset))];
        match self.state {
            AiState::Approach => {
                if distance > APPROACH_RANGE {
                    intents.push(toward);
                } else if rng.random_bool(0.5) {
                    self.enter(AiState::Attack, rng);
                }
            }
            AiState::Attack => {
                if distance < ATTACK_RANGE && rng.random_bool(0.6) {
                    intents.push(Intent::Attack);
                }
                if distance < TOO_CLOSE {
                    intents.push(away);
                } else if distance > TOO_FAR {
                    intents.push(toward);
                }
            }
            AiState::Retreat => {
                if distance < RETREAT_RANGE {
                    intents.push(away);
                } else {
                    self.enter(AiState::Approach, rng);
                }
            }
        }

        if rng.random_bool(JUMP_CHANCE) {
            intents.push(Intent::Jump);
        }
        intents
    }
}

impl EnemyBrain for TacticalBrain {
    fn ai_state(&self) -> AiState {
        self.state
    }

    fn tick(&mut self, target: TargetView, rng: &mut SimRng) -> Vec<Intent> {
        self.state_timer += 1;
        self.think_timer += 1;

        if self.state_timer >= self.state_duration {
            self.reselect(rng);
        }

        if self.think_timer >= self.think_interval {
            self.think_timer = 0;
            self.think(target, rng)
        } else {
            Vec::new()
        }
    }

    fn clone_box(&self) -> Box<dyn EnemyBrain> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct EnemyActor {
    pub id: u32,
    actor: Actor,
    brain: Box<dyn EnemyBrain>,
    /// Contact damage while attacking
    damage: u32,
    /// Damage of each projectile this enemy launches
    fire_damage: u32,
}

impl EnemyActor {
    pub fn new(id: u32, x: f64, health: u32, damage: u32, fire_damage: u32, bounds: Bounds) -> Self {
        Self::with_brain(
            id,
            Actor::new(x, Facing::Left, ActorTuning::enemy(), bounds).with_max_health(health),
            Box::new(TacticalBrain::default()),
            damage,
            fire_damage,
        )
    }

    pub fn with_brain(
        id: u32,
        mut actor: Actor,
        brain: Box<dyn EnemyBrain>,
        damage: u32,
        fire_damage: u32,
    ) -> Self {
        actor.start_running();
        Self {
            id,
            actor,
            brain,
            damage,
            fire_damage,
        }
    }

    pub fn ai_state(&self) -> AiState {
        self.brain.ai_state()
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn fire_damage(&self) -> u32 {
        self.fire_damage
    }

    /// Advance one tick toward a target at `target_x`.
    /// Returns true if a projectile was launched.
    pub fn update(&mut self, target_x: f64, rng: &mut SimRng) -> bool {
        if self.actor.is_dead() {
            let boundary = self.actor.advance_animation();
            self.actor.update_death(boundary);
            return false;
        }

        let view = TargetView {
            offset: self.actor.body().x() - target_x,
        };
        for intent in self.brain.tick(view, rng) {
            self.apply(intent);
        }

        self.actor.update_jump();
        self.actor.advance_animation();
        self.actor.update_projectiles();
        let launched = self.actor.update_attack();
        self.actor.update_invulnerability();
        if launched {
            log::debug!("Enemy {} fire launched facing {:?}", self.id, self.actor.facing());
        }
        launched
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Face(facing) => self.actor.face(facing),
            Intent::MoveForward => {
                self.actor.move_forward();
            }
            Intent::MoveBack => {
                self.actor.move_back();
            }
            Intent::Attack => {
                self.attack();
            }
            Intent::Jump => {
                self.actor.jump();
            }
        }
    }
}

impl Combatant for EnemyActor {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn attack(&mut self) -> bool {
        self.actor.attack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::DamageOutcome;
    use rand::SeedableRng;

    fn rng() -> SimRng {
        SimRng::seed_from_u64(7)
    }

    fn brain_in(state: AiState) -> TacticalBrain {
        TacticalBrain {
            state,
            state_duration: u32::MAX,
            ..Default::default()
        }
    }

    /// Scripted brain for deterministic enemy tests
    #[derive(Debug, Clone)]
    struct Scripted(Vec<Intent>);

    impl EnemyBrain for Scripted {
        fn ai_state(&self) -> AiState {
            AiState::Attack
        }

        fn tick(&mut self, _target: TargetView, _rng: &mut SimRng) -> Vec<Intent> {
            std::mem::take(&mut self.0)
        }

        fn clone_box(&self) -> Box<dyn EnemyBrain> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_thinks_every_interval() {
        let mut brain = brain_in(AiState::Approach);
        let mut rng = rng();
        let far = TargetView { offset: 400.0 };
        for _ in 0..THINK_INTERVAL - 1 {
            assert!(brain.tick(far, &mut rng).is_empty());
        }
        let intents = brain.tick(far, &mut rng);
        assert_eq!(intents[0], Intent::Face(Facing::Left));
        assert_eq!(intents[1], Intent::MoveBack);
    }

    #[test]
    fn test_approach_closes_in_from_the_left() {
        let mut brain = brain_in(AiState::Approach);
        let intents = brain.think(TargetView { offset: -400.0 }, &mut rng());
        assert_eq!(intents[0], Intent::Face(Facing::Right));
        assert_eq!(intents[1], Intent::MoveForward);
    }

    #[test]
    fn test_attack_state_keeps_distance() {
        let mut rng = rng();
        let mut brain = brain_in(AiState::Attack);
        let close = brain.think(TargetView { offset: 50.0 }, &mut rng);
        assert!(close.contains(&Intent::MoveForward));

        let far = brain.think(TargetView { offset: 500.0 }, &mut rng);
        assert!(far.contains(&Intent::MoveBack));
        assert!(!far.contains(&Intent::Attack));
    }

    #[test]
    fn test_attack_state_fires_sometimes_in_range() {
        let mut rng = rng();
        let mut brain = brain_in(AiState::Attack);
        let attacks = (0..200)
            .filter(|_| {
                brain
                    .think(TargetView { offset: 200.0 }, &mut rng)
                    .contains(&Intent::Attack)
            })
            .count();
        assert!(attacks > 80 && attacks < 160, "attacks = {attacks}");
    }

    #[test]
    fn test_retreat_switches_to_approach_when_far() {
        let mut rng = rng();
        let mut brain = brain_in(AiState::Retreat);
        let intents = brain.think(TargetView { offset: 120.0 }, &mut rng);
        assert!(intents.contains(&Intent::MoveForward));
        assert_eq!(brain.ai_state(), AiState::Retreat);

        brain.think(TargetView { offset: 320.0 }, &mut rng);
        assert_eq!(brain.ai_state(), AiState::Approach);
        assert!((90..=180).contains(&brain.state_duration()));
    }

    #[test]
    fn test_reselection_durations_match_state() {
        let mut rng = rng();
        let mut brain = TacticalBrain::default();
        for _ in 0..100 {
            brain.reselect(&mut rng);
            let range = match brain.ai_state() {
                AiState::Attack => 60..=120,
                AiState::Retreat => 30..=90,
                AiState::Approach => 90..=180,
            };
            assert!(range.contains(&brain.state_duration()));
        }
    }

    #[test]
    fn test_approach_reselection_favors_attack() {
        let mut rng = rng();
        let attacks = (0..1000)
            .filter(|_| {
                let mut brain = brain_in(AiState::Approach);
                brain.reselect(&mut rng);
                brain.ai_state() == AiState::Attack
            })
            .count();
        assert!(attacks > 740 && attacks < 860, "attacks = {attacks}");
    }

    #[test]
    fn test_enemy_takes_hits_then_dies_and_animates() {
        let mut enemy = EnemyActor::new(1, 640.0, 100, 20, 15, Bounds::default());
        let mut rng = rng();
        for _ in 0..3 {
            assert_eq!(enemy.take_damage(25), DamageOutcome::Hurt);
        }
        assert_eq!(enemy.actor().health(), 25);
        assert_eq!(enemy.take_damage(25), DamageOutcome::Killed);
        assert_eq!(enemy.actor().health(), 0);
        assert!(enemy.is_dead());

        let mut ticks = 0;
        while !enemy.actor().death_animation_complete() {
            assert!(!enemy.update(100.0, &mut rng));
            ticks += 1;
            assert!(ticks <= 60);
        }
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_scripted_enemy_fires_toward_target() {
        let actor = Actor::new(640.0, Facing::Right, ActorTuning::enemy(), Bounds::default());
        let brain = Scripted(vec![Intent::Face(Facing::Left), Intent::Attack]);
        let mut enemy = EnemyActor::with_brain(3, actor, Box::new(brain), 20, 15);
        let mut rng = rng();

        let launched = (0..40).filter(|_| enemy.update(100.0, &mut rng)).count();
        assert_eq!(launched, 1);
        assert_eq!(enemy.actor().facing(), Facing::Left);
    }

    #[test]
    fn test_death_clears_enemy_projectiles() {
        let actor = Actor::new(640.0, Facing::Left, ActorTuning::enemy(), Bounds::default());
        let brain = Scripted(vec![Intent::Attack]);
        let mut enemy = EnemyActor::with_brain(4, actor, Box::new(brain), 20, 15);
        let mut rng = rng();
        for _ in 0..12 {
            enemy.update(100.0, &mut rng);
        }
        assert_eq!(enemy.projectiles().len(), 1);
        enemy.actor_mut().kill();
        assert!(enemy.projectiles().is_empty());
    }
}
