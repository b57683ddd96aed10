//! Overlap tests used by the combat passes
//!
//! Actors are circles. Projectiles are axis-aligned boxes sized from their
//! sprite plus a fixed padding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::HITBOX_PADDING;

/// Axis-aligned projectile hitbox, stored as full width/height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    /// Hitbox for a sprite of the given visual size
    pub fn from_sprite(width: f32, height: f32) -> Self {
        Self {
            width: width + HITBOX_PADDING,
            height: height + HITBOX_PADDING,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// Circle-circle overlap. Touching circles do not overlap.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Box-vs-circle overlap
///
/// The circle is treated as its bounding square, so a box corner just outside
/// the true circle still counts. Overlap is false only when some axis is
/// fully separated.
pub fn rect_circle_overlap(center: Vec2, hitbox: Hitbox, target: Vec2, radius: f32) -> bool {
    let left = center.x - hitbox.half_width();
    let right = center.x + hitbox.half_width();
    let top = center.y - hitbox.half_height();
    let bottom = center.y + hitbox.half_height();

    let t_left = target.x - radius;
    let t_right = target.x + radius;
    let t_top = target.y - radius;
    let t_bottom = target.y + radius;

    !(left > t_right || right < t_left || top > t_bottom || bottom < t_top)
}

/// True if `point` lies within `radius` of `center` (area effects)
#[inline]
pub fn within_radius(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance(point) < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0));
    }

    #[test]
    fn test_touching_circles_miss() {
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_rect_circle_near_hit() {
        let hitbox = Hitbox {
            width: 12.0,
            height: 12.0,
        };
        assert!(rect_circle_overlap(
            Vec2::new(100.0, 100.0),
            hitbox,
            Vec2::new(103.0, 100.0),
            20.0
        ));
    }

    #[test]
    fn test_rect_circle_separated_axis() {
        let hitbox = Hitbox::from_sprite(10.0, 20.0);
        // 6 + 20 = 26 horizontal reach
        assert!(!rect_circle_overlap(
            Vec2::ZERO,
            hitbox,
            Vec2::new(27.0, 0.0),
            20.0
        ));
        // 11 + 20 = 31 vertical reach
        assert!(rect_circle_overlap(Vec2::ZERO, hitbox, Vec2::new(0.0, 30.0), 20.0));
        assert!(!rect_circle_overlap(Vec2::ZERO, hitbox, Vec2::new(0.0, 32.0), 20.0));
    }

    #[test]
    fn test_rect_circle_corner_approximation() {
        // Diagonal distance ~35.4 exceeds the true reach, but each axis overlaps
        let hitbox = Hitbox {
            width: 12.0,
            height: 12.0,
        };
        assert!(rect_circle_overlap(
            Vec2::ZERO,
            hitbox,
            Vec2::new(25.0, 25.0),
            20.0
        ));
    }

    #[test]
    fn test_hitbox_padding() {
        let hitbox = Hitbox::from_sprite(10.0, 20.0);
        assert_eq!(hitbox.width, 12.0);
        assert_eq!(hitbox.height, 22.0);
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Vec2::ZERO, 100.0, Vec2::new(60.0, 60.0)));
        assert!(!within_radius(Vec2::ZERO, 100.0, Vec2::new(80.0, 80.0)));
    }
}
