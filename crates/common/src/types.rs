use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A position on the ground plane. `z` is the world Z axis, not height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Planar projection of a 3D position (drops the Y axis).
    pub fn from_vec3(v: Vec3) -> Self {
        Self { x: v.x, z: v.z }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Lift onto the given height.
    pub fn at_height(self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.z)
    }

    pub fn distance_from_origin(self) -> f32 {
        self.to_vec2().length()
    }
}

/// Axis-aligned rectangle on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: WorldPoint,
    pub half_size: f32,
}

impl Rect {
    pub const fn new(center: WorldPoint, half_size: f32) -> Self {
        Self { center, half_size }
    }

    /// Inclusive containment test. Only the horizontal plane is considered.
    pub fn contains(&self, p: WorldPoint) -> bool {
        (p.x - self.center.x).abs() <= self.half_size
            && (p.z - self.center.z).abs() <= self.half_size
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation about the vertical axis only.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }
}

/// A pose expressed with Euler angles (XYZ order), the form wind offsets are
/// added to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn to_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.quat(),
            scale: Vec3::ONE,
        }
    }
}

/// Movement intent for a single frame.
///
/// The simulation consumes intents, never raw key events. `left`/`right` mean
/// strafe or turn depending on the active control scheme.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// One-shot: honoured only while grounded.
    pub jump: bool,
    /// Yaw change requested by mouse look, in radians.
    pub look_yaw: f32,
}

impl MoveIntent {
    /// True when no movement, jump or look was requested.
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right || self.jump)
            && self.look_yaw == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let r = Rect::new(WorldPoint::new(0.0, -250.0), 100.0);
        assert!(r.contains(WorldPoint::new(0.0, -250.0)));
        assert!(r.contains(WorldPoint::new(100.0, -150.0)));
        assert!(!r.contains(WorldPoint::new(100.1, -250.0)));
        assert!(!r.contains(WorldPoint::new(0.0, 0.0)));
    }

    #[test]
    fn world_point_projection_drops_height() {
        let p = WorldPoint::from_vec3(Vec3::new(3.0, 9.0, 4.0));
        assert_eq!(p, WorldPoint::new(3.0, 4.0));
        assert_eq!(p.distance_from_origin(), 5.0);
        assert_eq!(p.at_height(1.5), Vec3::new(3.0, 1.5, 4.0));
    }

    #[test]
    fn idle_intent() {
        assert!(MoveIntent::default().is_idle());
        let i = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        assert!(!i.is_idle());
    }

    #[test]
    fn zero_pose_is_identity_rotation() {
        let p = Pose::default();
        assert!(p.quat().abs_diff_eq(Quat::IDENTITY, 1e-6));
    }
}
