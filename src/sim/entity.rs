//! Rectangle entities and edge math
//!
//! Bodies (actors, obstacles) are corner-anchored: `pos` is the top-left
//! corner. Projectiles are center-anchored. `Aabb` converts both to explicit
//! edges so mixed pairs can be tested.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Smallest width/height an entity may have
pub const MIN_EXTENT: f64 = 1.0;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1.0 for right, -1.0 for left
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points along `dx`
    pub fn toward(dx: f64) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }

    pub fn is_right(self) -> bool {
        self == Facing::Right
    }
}

/// A positioned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: DVec2,
    pub size: DVec2,
}

impl Entity {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            size: DVec2::new(width.max(MIN_EXTENT), height.max(MIN_EXTENT)),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Change height, keeping it positive
    pub fn set_height(&mut self, height: f64) {
        self.size.y = height.max(MIN_EXTENT);
    }

    /// Center-distance overlap test
    ///
    /// Two entities collide iff their anchor distance is below half the summed
    /// extent on both axes. Only used for player vs obstacle.
    pub fn collides_with(&self, other: &Entity) -> bool {
        let half = (self.size + other.size) / 2.0;
        let delta = (self.pos - other.pos).abs();
        delta.x < half.x && delta.y < half.y
    }

    /// Edges treating `pos` as the top-left corner
    pub fn corner_aabb(&self) -> Aabb {
        Aabb {
            left: self.pos.x,
            right: self.pos.x + self.size.x,
            top: self.pos.y,
            bottom: self.pos.y + self.size.y,
        }
    }

    /// Edges treating `pos` as the center
    pub fn centered_aabb(&self) -> Aabb {
        let half = self.size / 2.0;
        Aabb {
            left: self.pos.x - half.x,
            right: self.pos.x + half.x,
            top: self.pos.y - half.y,
            bottom: self.pos.y + half.y,
        }
    }
}

/// Explicit rectangle edges (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Aabb {
    /// Inclusive test: touching edges count as a hit
    pub fn touches(&self, other: &Aabb) -> bool {
        self.right >= other.left
            && self.left <= other.right
            && self.bottom >= other.top
            && self.top <= other.bottom
    }

    /// Strict test: shared edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_distance_collision() {
        let a = Entity::new(100.0, 100.0, 60.0, 60.0);
        let b = Entity::new(159.0, 100.0, 60.0, 60.0);
        let c = Entity::new(160.0, 100.0, 60.0, 60.0);
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&c));
        assert!(b.collides_with(&a));
    }

    #[test]
    fn test_size_stays_positive() {
        let mut e = Entity::new(0.0, 0.0, 0.0, -5.0);
        assert_eq!(e.width(), MIN_EXTENT);
        assert_eq!(e.height(), MIN_EXTENT);
        e.set_height(0.0);
        assert_eq!(e.height(), MIN_EXTENT);
    }

    #[test]
    fn test_centered_vs_corner_edges() {
        let fire = Entity::new(100.0, 100.0, 60.0, 40.0);
        let edges = fire.centered_aabb();
        assert_eq!(edges.left, 70.0);
        assert_eq!(edges.right, 130.0);
        assert_eq!(edges.top, 80.0);
        assert_eq!(edges.bottom, 120.0);

        // Body whose left edge sits exactly on the fire's right edge
        let body = Entity::new(130.0, 90.0, 70.0, 70.0).corner_aabb();
        assert!(edges.touches(&body));
        assert!(!edges.overlaps(&body));
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::toward(-3.0), Facing::Left);
        assert_eq!(Facing::toward(0.0), Facing::Right);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
