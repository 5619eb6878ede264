use forestwalk_kernel::{Character, Perspective};
use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Eye at the tracked point, looking along the facing.
    FirstPerson,
    /// Chase camera behind and above the body center.
    ThirdPerson { distance: f32, height: f32 },
}

/// Camera that follows the character. Derived state only; the simulation
/// never reads it.
#[derive(Debug, Clone, Copy)]
pub struct FollowCamera {
    pub mode: CameraMode,
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            mode: CameraMode::FirstPerson,
            eye: Vec3::new(0.0, 1.7, 0.0),
            target: Vec3::new(0.0, 1.7, -1.0),
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FollowCamera {
    pub fn for_perspective(perspective: Perspective) -> Self {
        let mode = match perspective {
            Perspective::FirstPerson => CameraMode::FirstPerson,
            Perspective::ThirdPerson => CameraMode::ThirdPerson {
                distance: 5.0,
                height: 2.0,
            },
        };
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Snap to the character's current position and facing.
    pub fn follow(&mut self, character: &Character) {
        let forward = character.forward();
        match self.mode {
            CameraMode::FirstPerson => {
                self.eye = character.position;
                self.target = character.position + forward;
            }
            CameraMode::ThirdPerson { distance, height } => {
                self.eye = character.position - forward * distance + Vec3::Y * height;
                self.target = character.position + Vec3::Y * 0.5;
            }
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestwalk_common::WorldPoint;
    use forestwalk_kernel::MovementConfig;

    fn character() -> Character {
        Character::standing_at(WorldPoint::new(3.0, 4.0), &MovementConfig::default())
    }

    #[test]
    fn default_camera() {
        let cam = FollowCamera::default();
        assert!(cam.eye.y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn first_person_looks_along_facing() {
        let mut cam = FollowCamera::for_perspective(Perspective::FirstPerson);
        let c = character();
        cam.follow(&c);
        assert_eq!(cam.eye, c.position);
        assert!(cam.forward().abs_diff_eq(c.forward(), 1e-6));
    }

    #[test]
    fn third_person_sits_behind_and_above() {
        let mut cam = FollowCamera::for_perspective(Perspective::ThirdPerson);
        let c = character();
        cam.follow(&c);
        assert!(cam.eye.y > c.position.y);
        // Facing -Z, so the chase camera is at larger Z.
        assert!(cam.eye.z > c.position.z);
        assert!(!cam.view_projection().is_nan());
    }
}
