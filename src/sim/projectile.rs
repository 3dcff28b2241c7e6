//! Fire projectiles
//!
//! Center-anchored, self-propelled, and retired once they have travelled
//! `max_travel` pixels from where they were launched.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Facing};

/// Shape and motion of launched projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTuning {
    pub width: f64,
    pub height: f64,
    /// Pixels per tick
    pub speed: f64,
    /// Travel distance before the projectile burns out
    pub max_travel: f64,
    /// Horizontal offset from the launch point, along the facing
    pub muzzle_offset: f64,
    /// Ticks per animation frame
    pub anim_interval: u32,
    /// Animation frames before the loop restarts
    pub frame_count: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 40.0,
            speed: 8.0,
            max_travel: 200.0,
            muzzle_offset: 40.0,
            anim_interval: 3,
            frame_count: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    body: Entity,
    direction: Facing,
    speed: f64,
    origin_x: f64,
    max_travel: f64,
    active: bool,
    anim_frame: u32,
    anim_timer: u32,
    anim_interval: u32,
    frame_count: u32,
}

impl Projectile {
    /// Launch from `(x, y)`, shifted forward by the muzzle offset
    pub fn launch(x: f64, y: f64, direction: Facing, tuning: &ProjectileTuning) -> Self {
        let x = x + tuning.muzzle_offset * direction.sign();
        Self {
            body: Entity::new(x, y, tuning.width, tuning.height),
            direction,
            speed: tuning.speed,
            origin_x: x,
            max_travel: tuning.max_travel,
            active: true,
            anim_frame: 0,
            anim_timer: 0,
            anim_interval: tuning.anim_interval.max(1),
            frame_count: tuning.frame_count.max(1),
        }
    }

    /// Move one tick. Inactive projectiles never move or come back.
    pub fn update(&mut self) {
        if !self.active {
            return;
        }

        self.body.pos.x += self.speed * self.direction.sign();
        if self.travelled() >= self.max_travel {
            self.active = false;
        }

        self.anim_timer += 1;
        if self.anim_timer % self.anim_interval == 0 {
            self.anim_frame = (self.anim_frame + 1) % self.frame_count;
        }
    }

    /// Retire the projectile (hit something)
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn direction(&self) -> Facing {
        self.direction
    }

    pub fn anim_frame(&self) -> u32 {
        self.anim_frame
    }

    /// Distance from the launch point
    pub fn travelled(&self) -> f64 {
        (self.body.pos.x - self.origin_x).abs()
    }
}
