//! Environmental hazards
//!
//! Ground and flying hazards slide left at a constant speed; falling hazards
//! dive diagonally toward a fixed landing point. All retire once off-screen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground,
    Flying,
    Falling,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Ground => "ground",
            ObstacleKind::Flying => "flying",
            ObstacleKind::Falling => "falling",
        }
    }

    /// Body size in pixels
    pub fn size(&self) -> DVec2 {
        match self {
            ObstacleKind::Ground => DVec2::new(60.0, 60.0),
            ObstacleKind::Flying => DVec2::new(60.0, 50.0),
            ObstacleKind::Falling => DVec2::new(45.0, 70.0),
        }
    }
}

/// Ground and flying hazards enter this far past the right edge
pub const SPAWN_MARGIN: f64 = 20.0;
/// Hazards are retired once their x drops below this
pub const OFFSCREEN_X: f64 = -50.0;
/// Flying lane heights above the ground line
pub const FLYING_LANES: [f64; 3] = [120.0, 80.0, 40.0];
/// Falling hazards aim for this x on the ground line
pub const FALLING_TARGET_X: f64 = 100.0;
/// Horizontal and vertical speed scaling of a falling hazard
pub const FALLING_X_FACTOR: f64 = 1.3;
pub const FALLING_Y_FACTOR: f64 = 2.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Corner-anchored body
    pub body: Entity,
    /// Displacement per tick
    pub velocity: DVec2,
    dead: bool,
    /// Set once this obstacle has been tallied as passed
    pub(crate) counted: bool,
}

impl Obstacle {
    fn new(id: u32, kind: ObstacleKind, pos: DVec2, velocity: DVec2) -> Self {
        let size = kind.size();
        Self {
            id,
            kind,
            body: Entity::new(pos.x, pos.y, size.x, size.y),
            velocity,
            dead: false,
            counted: false,
        }
    }

    /// Ground hazard entering from the right edge
    pub fn ground(id: u32, speed: f64, bounds: &Bounds) -> Self {
        let size = ObstacleKind::Ground.size();
        Self::new(
            id,
            ObstacleKind::Ground,
            DVec2::new(bounds.width + SPAWN_MARGIN, bounds.ground_y - size.y),
            DVec2::new(-speed, 0.0),
        )
    }

    /// Flying hazard entering from the right edge in `lane` (0 = highest)
    pub fn flying(id: u32, lane: usize, speed: f64, bounds: &Bounds) -> Self {
        let height = FLYING_LANES[lane.min(FLYING_LANES.len() - 1)];
        Self::new(
            id,
            ObstacleKind::Flying,
            DVec2::new(bounds.width + SPAWN_MARGIN, bounds.ground_y - height),
            DVec2::new(-speed, 0.0),
        )
    }

    /// Falling hazard dropping from the top edge at `x`
    pub fn falling(id: u32, x: f64, speed: f64, bounds: &Bounds) -> Self {
        let delta = DVec2::new(FALLING_TARGET_X - x, bounds.ground_y);
        let dir = delta.normalize_or_zero();
        let velocity = DVec2::new(
            -(dir.x * speed * FALLING_X_FACTOR).abs(),
            (dir.y * speed * FALLING_Y_FACTOR).abs(),
        );
        Self::new(id, ObstacleKind::Falling, DVec2::new(x, 0.0), velocity)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Mark destroyed (hit by a projectile)
    pub fn destroy(&mut self) {
        self.dead = true;
    }

    pub fn update(&mut self, bounds: &Bounds) {
        if self.dead {
            return;
        }
        self.body.pos += self.velocity;

        let off_left = self.body.x() < OFFSCREEN_X;
        let landed = self.kind == ObstacleKind::Falling && self.body.y() > bounds.ground_y;
        if off_left || landed {
            self.dead = true;
        }
    }
}
