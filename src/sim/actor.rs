//! Actor core shared by the player and enemies
//!
//! Three independent machines drive an actor:
//! - `Locomotion`: Idle / Running / Jumping / Ducking (mutually exclusive)
//! - `AttackPhase`: Idle -> Windup -> Active -> Recovery -> Idle
//! - `Life`: Alive -> Dying (death animation) -> Dead
//!
//! Death overrides the other two: once the actor is not `Alive`, movement and
//! attack requests are ignored. Health is only changed through `take_damage`
//! and `kill`.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Facing};
use super::projectile::{Projectile, ProjectileTuning};
use crate::Bounds;

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Locomotion {
    Idle,
    Running,
    /// Airborne with vertical velocity (negative is up)
    Jumping { velocity: f64 },
    Ducking,
}

/// Attack sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    Idle,
    Windup { elapsed: u32 },
    Active { elapsed: u32 },
    /// Last attack finished; back to Idle on the next tick. A new attack may start.
    Recovery,
}

/// Life state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Life {
    Alive,
    /// Death animation playing at `frame`
    Dying { frame: u32 },
    /// Death animation finished
    Dead,
}

/// Result of a damage request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable or already dead
    Ignored,
    Hurt,
    Killed,
}

/// Where projectiles leave the body, as fractions of its size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mouth {
    /// X fraction when facing right
    pub right: f64,
    /// X fraction when facing left
    pub left: f64,
    /// Y fraction from the top
    pub y: f64,
}

/// Per-variant actor constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorTuning {
    pub width: f64,
    pub height: f64,
    pub duck_height: f64,
    /// Pixels per move step
    pub move_step: f64,
    pub gravity: f64,
    /// Initial vertical velocity of a jump
    pub jump_velocity: f64,
    pub max_health: u32,
    /// Ticks of damage immunity after a hit
    pub invulnerability_ticks: u32,
    /// Ticks per animation frame
    pub anim_interval: u32,
    pub death_frames: u32,
    /// Attack becomes Active after this many ticks
    pub windup_ticks: u32,
    /// Attack completes after this many ticks
    pub attack_ticks: u32,
    /// Ticks from attack start until the projectile is launched
    pub fire_delay: u32,
    pub clear_projectiles_on_death: bool,
    pub mouth: Mouth,
    pub projectile: ProjectileTuning,
}

impl ActorTuning {
    pub fn player() -> Self {
        Self {
            width: 70.0,
            height: 70.0,
            duck_height: 40.0,
            move_step: 5.0,
            gravity: 0.4,
            jump_velocity: -12.0,
            max_health: 100,
            invulnerability_ticks: 60,
            anim_interval: 10,
            death_frames: 6,
            windup_ticks: 5,
            attack_ticks: 30,
            fire_delay: 20,
            clear_projectiles_on_death: false,
            mouth: Mouth {
                right: 0.2,
                left: 1.0,
                y: 0.4,
            },
            projectile: ProjectileTuning::default(),
        }
    }

    pub fn enemy() -> Self {
        Self {
            invulnerability_ticks: 0,
            fire_delay: 10,
            clear_projectiles_on_death: true,
            mouth: Mouth {
                right: 0.8,
                left: 0.2,
                y: 0.4,
            },
            ..Self::player()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub(crate) body: Entity,
    pub(crate) facing: Facing,
    health: u32,
    max_health: u32,
    locomotion: Locomotion,
    attack: AttackPhase,
    /// Ticks since attack start while a projectile is still owed
    fire_timer: Option<u32>,
    life: Life,
    /// Remaining ticks of damage immunity
    invulnerable_for: u32,
    anim_timer: u32,
    anim_frame: u32,
    projectiles: Vec<Projectile>,
    tuning: ActorTuning,
    bounds: Bounds,
}

impl Actor {
    /// Create an actor standing on the ground at `x`
    pub fn new(x: f64, facing: Facing, tuning: ActorTuning, bounds: Bounds) -> Self {
        let y = bounds.ground_y - tuning.height;
        Self {
            body: Entity::new(x, y, tuning.width, tuning.height),
            facing,
            health: tuning.max_health,
            max_health: tuning.max_health,
            locomotion: Locomotion::Idle,
            attack: AttackPhase::Idle,
            fire_timer: None,
            life: Life::Alive,
            invulnerable_for: 0,
            anim_timer: 0,
            anim_frame: 0,
            projectiles: Vec::new(),
            tuning,
            bounds,
        }
    }

    /// Override max health and refill
    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health.max(1);
        self.health = self.max_health;
        self
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    pub fn attack_phase(&self) -> AttackPhase {
        self.attack
    }

    pub fn life(&self) -> Life {
        self.life
    }

    pub fn tuning(&self) -> &ActorTuning {
        &self.tuning
    }

    pub fn is_dead(&self) -> bool {
        self.life != Life::Alive
    }

    pub fn death_animation_complete(&self) -> bool {
        self.life == Life::Dead
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.locomotion, Locomotion::Jumping { .. })
    }

    pub fn is_ducking(&self) -> bool {
        self.locomotion == Locomotion::Ducking
    }

    /// Windup or Active
    pub fn is_attacking(&self) -> bool {
        matches!(
            self.attack,
            AttackPhase::Windup { .. } | AttackPhase::Active { .. }
        )
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0
    }

    pub fn anim_frame(&self) -> u32 {
        self.anim_frame
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Projectiles are only deactivated through this slice, never removed
    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    fn ground_top(&self) -> f64 {
        self.bounds.ground_y - self.body.height()
    }

    /// Idle -> Running
    pub fn start_running(&mut self) {
        if !self.is_dead() && self.locomotion == Locomotion::Idle {
            self.locomotion = Locomotion::Running;
        }
    }

    pub fn jump(&mut self) -> bool {
        if self.is_dead() || self.is_jumping() {
            return false;
        }
        if self.is_ducking() {
            self.stand_up();
        }
        self.locomotion = Locomotion::Jumping {
            velocity: self.tuning.jump_velocity,
        };
        true
    }

    pub fn duck(&mut self) -> bool {
        if self.is_dead() || self.is_jumping() || self.is_ducking() {
            return false;
        }
        self.locomotion = Locomotion::Ducking;
        self.body.set_height(self.tuning.duck_height);
        self.body.pos.y = self.ground_top();
        true
    }

    pub fn stop_ducking(&mut self) -> bool {
        if self.is_dead() || !self.is_ducking() {
            return false;
        }
        self.stand_up();
        self.locomotion = Locomotion::Running;
        true
    }

    fn stand_up(&mut self) {
        self.body.set_height(self.tuning.height);
        self.body.pos.y = self.ground_top();
    }

    pub fn move_forward(&mut self) -> bool {
        self.step(Facing::Right)
    }

    pub fn move_back(&mut self) -> bool {
        self.step(Facing::Left)
    }

    fn step(&mut self, facing: Facing) -> bool {
        if self.is_dead() {
            return false;
        }
        let x = self.body.pos.x + self.tuning.move_step * facing.sign();
        self.body.pos.x = x.clamp(0.0, self.bounds.width);
        self.facing = facing;
        true
    }

    /// Face a direction without moving
    pub fn face(&mut self, facing: Facing) {
        if !self.is_dead() {
            self.facing = facing;
        }
    }

    /// Start an attack. Ignored while attacking or dead.
    pub fn attack(&mut self) -> bool {
        if self.is_dead() || self.is_attacking() {
            return false;
        }
        self.attack = AttackPhase::Windup { elapsed: 0 };
        self.fire_timer = Some(0);
        true
    }

    /// Apply damage unless invulnerable or dead
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_dead() || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_for = self.tuning.invulnerability_ticks;
        if self.health == 0 {
            self.die();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Kill outright, ignoring invulnerability. No-op if already dead.
    pub fn kill(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = 0;
        self.die();
        true
    }

    fn die(&mut self) {
        if self.is_ducking() {
            self.stand_up();
        }
        self.life = Life::Dying { frame: 0 };
        self.locomotion = Locomotion::Idle;
        self.attack = AttackPhase::Idle;
        self.fire_timer = None;
        self.invulnerable_for = 0;
        self.anim_timer = 0;
        if self.tuning.clear_projectiles_on_death {
            self.projectiles.clear();
        }
    }

    /// Advance the animation clock. Returns true when a frame boundary is crossed.
    pub(crate) fn advance_animation(&mut self) -> bool {
        self.anim_timer += 1;
        if self.anim_timer >= self.tuning.anim_interval.max(1) {
            self.anim_timer = 0;
            self.anim_frame = self.anim_frame.wrapping_add(1);
            true
        } else {
            false
        }
    }

    /// Step the death animation on a frame boundary
    pub(crate) fn update_death(&mut self, frame_boundary: bool) {
        if let Life::Dying { frame } = self.life {
            if !frame_boundary {
                return;
            }
            let frame = frame + 1;
            self.life = if frame >= self.tuning.death_frames {
                Life::Dead
            } else {
                Life::Dying { frame }
            };
        }
    }

    pub(crate) fn update_jump(&mut self) {
        if let Locomotion::Jumping { velocity } = self.locomotion {
            let velocity = velocity + self.tuning.gravity;
            self.body.pos.y += velocity;
            let ground = self.ground_top();
            if self.body.pos.y >= ground {
                self.body.pos.y = ground;
                self.locomotion = Locomotion::Running;
            } else {
                self.locomotion = Locomotion::Jumping { velocity };
            }
        }
    }

    /// Advance the attack machine. Returns true if a projectile was launched.
    pub(crate) fn update_attack(&mut self) -> bool {
        let elapsed = match self.attack {
            AttackPhase::Windup { elapsed } | AttackPhase::Active { elapsed } => elapsed + 1,
            AttackPhase::Recovery => {
                self.attack = AttackPhase::Idle;
                return false;
            }
            AttackPhase::Idle => return false,
        };

        self.attack = if elapsed > self.tuning.attack_ticks {
            AttackPhase::Recovery
        } else if elapsed > self.tuning.windup_ticks {
            AttackPhase::Active { elapsed }
        } else {
            AttackPhase::Windup { elapsed }
        };

        if self.attack == AttackPhase::Recovery {
            self.fire_timer = None;
            self.start_running();
            return false;
        }

        let Some(timer) = self.fire_timer else {
            return false;
        };
        let timer = timer + 1;
        if timer >= self.tuning.fire_delay && matches!(self.attack, AttackPhase::Active { .. }) {
            self.fire_timer = None;
            self.launch_projectile();
            true
        } else {
            self.fire_timer = Some(timer);
            false
        }
    }

    fn launch_projectile(&mut self) {
        let mouth = self.tuning.mouth;
        let fraction = if self.facing.is_right() {
            mouth.right
        } else {
            mouth.left
        };
        let x = self.body.pos.x + self.body.width() * fraction;
        let y = self.body.pos.y + self.body.height() * mouth.y;
        self.projectiles
            .push(Projectile::launch(x, y, self.facing, &self.tuning.projectile));
    }

    pub(crate) fn update_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        self.prune_projectiles();
    }

    /// Drop projectiles that went inactive this tick
    pub(crate) fn prune_projectiles(&mut self) {
        self.projectiles.retain(|p| p.is_active());
    }

    pub(crate) fn update_invulnerability(&mut self) {
        self.invulnerable_for = self.invulnerable_for.saturating_sub(1);
    }
}

/// Capabilities shared by the player and enemies
pub trait Combatant {
    fn actor(&self) -> &Actor;

    fn actor_mut(&mut self) -> &mut Actor;

    /// Start an attack, subject to the variant's own rules
    fn attack(&mut self) -> bool;

    fn body(&self) -> &Entity {
        self.actor().body()
    }

    fn is_dead(&self) -> bool {
        self.actor().is_dead()
    }

    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        self.actor_mut().take_damage(amount)
    }

    fn jump(&mut self) -> bool {
        self.actor_mut().jump()
    }

    fn duck(&mut self) -> bool {
        self.actor_mut().duck()
    }

    fn stop_ducking(&mut self) -> bool {
        self.actor_mut().stop_ducking()
    }

    fn move_forward(&mut self) -> bool {
        self.actor_mut().move_forward()
    }

    fn move_back(&mut self) -> bool {
        self.actor_mut().move_back()
    }

    fn projectiles(&self) -> &[Projectile] {
        self.actor().projectiles()
    }

    fn projectiles_mut(&mut self) -> &mut [Projectile] {
        self.actor_mut().projectiles_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        let mut actor = Actor::new(100.0, Facing::Right, ActorTuning::player(), Bounds::default());
        actor.start_running();
        actor
    }

    /// Run the attack machine for `ticks` ticks, counting launches
    fn run_attack(actor: &mut Actor, ticks: u32) -> u32 {
        (0..ticks).filter(|_| actor.update_attack()).count() as u32
    }

    #[test]
    fn test_new_actor_stands_on_ground() {
        let a = actor();
        let bounds = Bounds::default();
        assert_eq!(a.body().y() + a.body().height(), bounds.ground_y);
        assert_eq!(a.health(), 100);
        assert_eq!(a.locomotion(), Locomotion::Running);
    }

    #[test]
    fn test_jump_arc_lands_running() {
        let mut a = actor();
        let ground = a.body().y();
        assert!(a.jump());
        assert!(!a.jump());

        let mut peak = ground;
        let mut ticks = 0;
        while a.is_jumping() {
            a.update_jump();
            peak = peak.min(a.body().y());
            ticks += 1;
            assert!(ticks < 200, "jump never landed");
        }
        assert!(peak < ground - 100.0);
        assert_eq!(a.body().y(), ground);
        assert_eq!(a.locomotion(), Locomotion::Running);
    }

    #[test]
    fn test_duck_shrinks_and_reanchors() {
        let mut a = actor();
        let bounds = Bounds::default();
        assert!(a.duck());
        assert_eq!(a.body().height(), 40.0);
        assert_eq!(a.body().y(), bounds.ground_y - 40.0);
        assert!(!a.duck());

        assert!(a.stop_ducking());
        assert_eq!(a.body().height(), 70.0);
        assert_eq!(a.body().y(), bounds.ground_y - 70.0);
        assert!(!a.stop_ducking());
    }

    #[test]
    fn test_cannot_duck_midair() {
        let mut a = actor();
        a.jump();
        a.update_jump();
        assert!(!a.duck());
    }

    #[test]
    fn test_movement_clamps_to_screen() {
        let mut a = Actor::new(2.0, Facing::Right, ActorTuning::player(), Bounds::default());
        a.move_back();
        assert_eq!(a.body().x(), 0.0);
        assert_eq!(a.facing(), Facing::Left);

        a.body.pos.x = 798.0;
        a.move_forward();
        assert_eq!(a.body().x(), 800.0);
        assert_eq!(a.facing(), Facing::Right);
    }

    #[test]
    fn test_attack_phases_and_single_launch() {
        let mut a = actor();
        assert!(a.attack());
        assert!(!a.attack());

        assert_eq!(run_attack(&mut a, 5), 0);
        assert!(matches!(a.attack_phase(), AttackPhase::Windup { elapsed: 5 }));
        a.update_attack();
        assert!(matches!(a.attack_phase(), AttackPhase::Active { elapsed: 6 }));

        // Fire delay is 20 ticks from the start
        assert_eq!(run_attack(&mut a, 13), 0);
        assert!(a.update_attack());
        assert_eq!(a.projectiles().len(), 1);

        assert_eq!(run_attack(&mut a, 11), 0);
        assert_eq!(a.attack_phase(), AttackPhase::Recovery);
        assert!(!a.is_attacking());
        assert!(a.attack());
    }

    #[test]
    fn test_recovery_returns_to_idle() {
        let mut a = actor();
        a.attack();
        let ticks = a.tuning().attack_ticks + 1;
        assert_eq!(run_attack(&mut a, ticks), 1);
        assert_eq!(a.attack_phase(), AttackPhase::Recovery);
        assert_eq!(a.locomotion(), Locomotion::Running);

        a.update_attack();
        assert_eq!(a.attack_phase(), AttackPhase::Idle);
        a.update_attack();
        assert_eq!(a.attack_phase(), AttackPhase::Idle);
        assert!(a.attack());
    }

    #[test]
    fn test_dying_while_ducking_restores_full_height() {
        let mut a = actor();
        let bounds = Bounds::default();
        a.duck();
        assert!(a.kill());
        assert_eq!(a.body().height(), 70.0);
        assert_eq!(a.body().y(), bounds.ground_y - 70.0);
        assert!(!a.is_ducking());
    }

    #[test]
    fn test_invulnerability_window() {
        let mut a = actor();
        assert_eq!(a.take_damage(30), DamageOutcome::Hurt);
        assert_eq!(a.take_damage(30), DamageOutcome::Ignored);
        assert_eq!(a.health(), 70);

        for _ in 0..59 {
            a.update_invulnerability();
            assert_eq!(a.take_damage(30), DamageOutcome::Ignored);
        }
        a.update_invulnerability();
        assert_eq!(a.take_damage(30), DamageOutcome::Hurt);
        assert_eq!(a.health(), 40);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut a = actor();
        a.attack();
        assert_eq!(a.take_damage(500), DamageOutcome::Killed);
        assert_eq!(a.health(), 0);
        assert!(a.is_dead());
        assert!(!a.is_attacking());

        let body = *a.body();
        assert!(!a.jump());
        assert!(!a.duck());
        assert!(!a.move_forward());
        assert!(!a.move_back());
        assert!(!a.attack());
        assert_eq!(*a.body(), body);
        assert_eq!(a.attack_phase(), AttackPhase::Idle);
        assert_eq!(a.take_damage(10), DamageOutcome::Ignored);
        assert!(!a.kill());
    }

    #[test]
    fn test_death_animation_runs_to_completion() {
        let mut a = actor();
        a.kill();
        let tuning = *a.tuning();
        let total = tuning.anim_interval * tuning.death_frames;
        for _ in 0..total - 1 {
            let boundary = a.advance_animation();
            a.update_death(boundary);
            assert!(!a.death_animation_complete());
        }
        let boundary = a.advance_animation();
        a.update_death(boundary);
        assert!(a.death_animation_complete());
    }

    #[test]
    fn test_kill_ignores_invulnerability() {
        let mut a = actor();
        a.take_damage(10);
        assert!(a.is_invulnerable());
        assert!(a.kill());
        assert_eq!(a.health(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_health_never_underflows(hits in prop::collection::vec(0u32..300, 1..20)) {
                let mut a = actor();
                for amount in hits {
                    a.take_damage(amount);
                    for _ in 0..a.tuning().invulnerability_ticks {
                        a.update_invulnerability();
                    }
                    prop_assert!(a.health() <= a.max_health());
                    prop_assert_eq!(a.health() == 0, a.is_dead());
                }
            }
        }
    }
}
