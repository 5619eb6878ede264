//! Third-person body rig with a walk-cycle limb swing.

use forestwalk_common::Pose;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Walk phase advance per unit of horizontal distance.
const STRIDE_RATE: f32 = 2.0;
/// Peak limb rotation while walking, radians.
const MAX_SWING: f32 = 0.6;
/// How quickly the swing amplitude eases in and out, per second.
const SWING_EASE: f32 = 8.0;
const BOB_HEIGHT: f32 = 0.03;

/// Body-part poses relative to the character's body center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigPose {
    pub torso: Pose,
    pub head: Pose,
    pub left_arm: Pose,
    pub right_arm: Pose,
    pub left_leg: Pose,
    pub right_leg: Pose,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterRig {
    pub walk_phase: f32,
    /// Current swing amplitude, eased toward `MAX_SWING` while walking.
    pub swing: f32,
}

impl CharacterRig {
    pub fn update(&mut self, horizontal_distance: f32, dt: f32) {
        let walking = horizontal_distance > 1e-4;
        if walking {
            self.walk_phase = (self.walk_phase + horizontal_distance * STRIDE_RATE)
                % std::f32::consts::TAU;
        }
        let target = if walking { MAX_SWING } else { 0.0 };
        let k = (dt * SWING_EASE).min(1.0);
        self.swing += (target - self.swing) * k;
    }

    pub fn pose(&self) -> RigPose {
        let s = self.walk_phase.sin() * self.swing;
        let bob = self.walk_phase.sin().abs() * BOB_HEIGHT * (self.swing / MAX_SWING);
        let limb = |offset: Vec3, swing: f32| Pose::new(offset, Vec3::new(swing, 0.0, 0.0));
        RigPose {
            torso: Pose::new(Vec3::new(0.0, 0.15 + bob, 0.0), Vec3::ZERO),
            head: Pose::new(Vec3::new(0.0, 0.65 + bob, 0.0), Vec3::ZERO),
            left_arm: limb(Vec3::new(-0.3, 0.25, 0.0), s),
            right_arm: limb(Vec3::new(0.3, 0.25, 0.0), -s),
            left_leg: limb(Vec3::new(-0.12, -0.45, 0.0), -s),
            right_leg: limb(Vec3::new(0.12, -0.45, 0.0), s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_rig_is_neutral() {
        let rig = CharacterRig::default();
        let pose = rig.pose();
        assert_eq!(pose.left_arm.rotation, Vec3::ZERO);
        assert_eq!(pose.right_leg.rotation, Vec3::ZERO);
    }

    #[test]
    fn walking_swings_limbs_in_opposition() {
        let mut rig = CharacterRig::default();
        for _ in 0..30 {
            rig.update(0.16, 1.0 / 60.0);
        }
        let pose = rig.pose();
        assert!(rig.swing > 0.5);
        assert_eq!(pose.left_arm.rotation.x, -pose.right_arm.rotation.x);
        assert_eq!(pose.left_arm.rotation.x, -pose.left_leg.rotation.x);
    }

    #[test]
    fn swing_eases_out_when_stopped() {
        let mut rig = CharacterRig {
            walk_phase: 1.0,
            swing: MAX_SWING,
        };
        for _ in 0..120 {
            rig.update(0.0, 1.0 / 60.0);
        }
        assert!(rig.swing < 1e-3);
        assert_eq!(rig.walk_phase, 1.0);
    }
}
