//! The input-driven player actor
//!
//! Adds a per-level projectile budget on top of the shared actor machines.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorTuning, Combatant};
use super::entity::Facing;
use crate::Bounds;
use crate::consts::PLAYER_START_X;

/// How many projectiles the player may launch this level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireBudget {
    Limited(u32),
    Unlimited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerActor {
    actor: Actor,
    budget: FireBudget,
    /// Attacks started this level; never decreases
    projectiles_used: u32,
}

impl PlayerActor {
    pub fn new(budget: FireBudget, bounds: Bounds) -> Self {
        Self::with_tuning(budget, ActorTuning::player(), bounds)
    }

    pub fn with_tuning(budget: FireBudget, tuning: ActorTuning, bounds: Bounds) -> Self {
        let mut actor = Actor::new(PLAYER_START_X, Facing::Right, tuning, bounds);
        actor.start_running();
        Self {
            actor,
            budget,
            projectiles_used: 0,
        }
    }

    pub fn budget(&self) -> FireBudget {
        self.budget
    }

    pub fn projectiles_used(&self) -> u32 {
        self.projectiles_used
    }

    /// Remaining launches, `None` when unlimited
    pub fn projectiles_remaining(&self) -> Option<u32> {
        match self.budget {
            FireBudget::Limited(max) => Some(max.saturating_sub(self.projectiles_used)),
            FireBudget::Unlimited => None,
        }
    }

    fn budget_allows(&self) -> bool {
        self.projectiles_remaining() != Some(0)
    }

    /// Whether an attack request would be accepted right now
    pub fn can_attack(&self) -> bool {
        !self.actor.is_dead() && !self.actor.is_attacking() && self.budget_allows()
    }

    /// Kill outright (obstacle contact)
    pub fn kill(&mut self) -> bool {
        self.actor.kill()
    }

    /// Advance one tick. Returns true if a projectile was launched.
    pub fn update(&mut self) -> bool {
        let actor = &mut self.actor;
        let boundary = actor.advance_animation();
        actor.update_jump();
        actor.update_death(boundary);
        let launched = actor.update_attack();
        actor.update_projectiles();
        actor.update_invulnerability();
        if launched {
            log::debug!(
                "Player fire launched ({} used)",
                self.projectiles_used
            );
        }
        launched
    }
}

impl Combatant for PlayerActor {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn attack(&mut self) -> bool {
        if !self.budget_allows() || !self.actor.attack() {
            return false;
        }
        if let FireBudget::Limited(_) = self.budget {
            self.projectiles_used += 1;
        }
        true
    }
}
