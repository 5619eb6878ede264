//! Circle-vs-circle push-out against tree trunks on the ground plane.

use forestwalk_common::WorldPoint;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Below this planar distance the push direction is undefined.
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// A static collision circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: WorldPoint,
    pub radius: f32,
}

/// Push `position` out of the first overlapping obstacle, in slice order.
///
/// Only the XZ plane is considered; `position.y` is left untouched. On overlap
/// the position is moved along the obstacle-to-position direction until the
/// circles just touch, and the obstacle's index is returned. Later obstacles
/// are not examined in the same call. A position exactly on an obstacle center
/// is pushed along +X.
pub fn resolve(position: &mut Vec3, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    let here = Vec2::new(position.x, position.z);
    for (index, obstacle) in obstacles.iter().enumerate() {
        let center = obstacle.center.to_vec2();
        let offset = here - center;
        let distance = offset.length();
        let min_distance = radius + obstacle.radius;
        if distance >= min_distance {
            continue;
        }
        let normal = if distance > DEGENERATE_DISTANCE {
            offset / distance
        } else {
            Vec2::X
        };
        let pushed = center + normal * min_distance;
        position.x = pushed.x;
        position.z = pushed.y;
        tracing::trace!(index, depth = min_distance - distance, "pushed out of obstacle");
        return Some(index);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(x: f32, z: f32, radius: f32) -> Obstacle {
        Obstacle {
            center: WorldPoint::new(x, z),
            radius,
        }
    }

    fn planar_distance(p: Vec3, o: &Obstacle) -> f32 {
        Vec2::new(p.x, p.z).distance(o.center.to_vec2())
    }

    #[test]
    fn overlap_is_pushed_to_contact_distance() {
        let obstacles = [tree(5.0, 5.0, 0.7)];
        let mut pos = Vec3::new(5.3, 1.7, 5.4);
        assert_eq!(resolve(&mut pos, 0.5, &obstacles), Some(0));
        assert!((planar_distance(pos, &obstacles[0]) - 1.2).abs() < 1e-5);
        assert_eq!(pos.y, 1.7);
    }

    #[test]
    fn push_keeps_direction() {
        let obstacles = [tree(0.0, 0.0, 1.0)];
        let mut pos = Vec3::new(0.0, 0.0, 0.5);
        resolve(&mut pos, 0.5, &obstacles);
        assert!(pos.x.abs() < 1e-6);
        assert!((pos.z - 1.5).abs() < 1e-6);
    }

    #[test]
    fn clear_position_is_untouched() {
        let obstacles = [tree(0.0, 0.0, 1.0), tree(10.0, 0.0, 1.0)];
        let mut pos = Vec3::new(5.0, 2.0, 0.0);
        assert_eq!(resolve(&mut pos, 0.5, &obstacles), None);
        assert_eq!(pos, Vec3::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn touching_is_not_a_collision() {
        let obstacles = [tree(0.0, 0.0, 1.0)];
        let mut pos = Vec3::new(1.5, 0.0, 0.0);
        assert_eq!(resolve(&mut pos, 0.5, &obstacles), None);
    }

    #[test]
    fn first_overlap_wins() {
        let obstacles = [tree(10.0, 0.0, 1.0), tree(0.0, 0.0, 1.0), tree(0.4, 0.0, 1.0)];
        let mut pos = Vec3::new(0.2, 0.0, 0.0);
        assert_eq!(resolve(&mut pos, 0.5, &obstacles), Some(1));
        assert!((planar_distance(pos, &obstacles[1]) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn dead_center_falls_back_to_x_axis() {
        let obstacles = [tree(3.0, -2.0, 0.7)];
        let mut pos = Vec3::new(3.0, 1.0, -2.0);
        assert_eq!(resolve(&mut pos, 0.5, &obstacles), Some(0));
        assert!(pos.is_finite());
        assert!((pos.x - 4.2).abs() < 1e-5);
        assert_eq!(pos.z, -2.0);
    }
}
