//! Character movement integration: gravity, jump, input-driven horizontal
//! motion, ground contact and world-bound clamping.

use std::f32::consts::TAU;

use forestwalk_common::{MoveIntent, Rect, WorldPoint};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{ControlScheme, MovementConfig};

/// Vertical contact state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Grounded,
    Airborne,
}

/// Physics side of the movement state. Input flags arrive per frame as a
/// [`MoveIntent`] and are latched into `intent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    pub intent: MoveIntent,
    /// Units per second. `x`/`z` are recomputed every frame, `y` integrates.
    pub velocity: Vec3,
    pub can_jump: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            intent: MoveIntent::default(),
            velocity: Vec3::ZERO,
            can_jump: true,
        }
    }
}

impl MovementState {
    pub fn contact(&self) -> Contact {
        if self.can_jump {
            Contact::Grounded
        } else {
            Contact::Airborne
        }
    }
}

/// The controlled character: the tracked point, its facing, and movement state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub position: Vec3,
    /// Facing in radians, wrapped to `[0, 2π)`. Zero faces -Z.
    pub yaw: f32,
    pub movement: MovementState,
}

impl Character {
    pub fn standing_at(point: WorldPoint, config: &MovementConfig) -> Self {
        Self {
            position: point.at_height(config.stand_height()),
            yaw: 0.0,
            movement: MovementState::default(),
        }
    }

    /// Unit facing vector on the ground plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Unit vector to the character's right on the ground plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}

/// What happened during one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    pub jumped: bool,
    pub landed: bool,
    pub in_water: bool,
    /// Horizontal displacement length, before clamping.
    pub horizontal_distance: f32,
}

/// Advance the character by `dt` seconds.
///
/// `water` slows horizontal motion when the character starts the frame inside
/// it. `half_extent` bounds both horizontal axes.
pub fn integrate(
    character: &mut Character,
    intent: MoveIntent,
    config: &MovementConfig,
    half_extent: f32,
    water: Rect,
    dt: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let state = &mut character.movement;
    state.intent = intent;

    // A zero-length frame cannot leave the ground, so it cannot start a jump.
    if intent.jump && state.can_jump && dt > 0.0 {
        state.velocity.y = config.jump_force;
        state.can_jump = false;
        outcome.jumped = true;
    }

    state.velocity.y -= config.gravity * dt;

    match config.scheme {
        ControlScheme::Strafe => {
            character.yaw = wrap_angle(character.yaw + intent.look_yaw);
        }
        ControlScheme::Turn => {
            if intent.left {
                character.yaw = wrap_angle(character.yaw + config.rotation_speed * dt);
            }
            if intent.right {
                character.yaw = wrap_angle(character.yaw - config.rotation_speed * dt);
            }
        }
    }

    outcome.in_water = water.contains(WorldPoint::from_vec3(character.position));
    let speed = if outcome.in_water {
        config.speed * config.water_speed_factor
    } else {
        config.speed
    };

    let heading = horizontal_direction(character, config.scheme) * speed;
    let state = &mut character.movement;
    state.velocity.x = heading.x;
    state.velocity.z = heading.z;

    let displacement = state.velocity * dt;
    outcome.horizontal_distance = Vec2::new(displacement.x, displacement.z).length();
    character.position += displacement;

    clamp_to_world(&mut character.position, half_extent);

    let stand = config.stand_height();
    if character.position.y <= stand {
        character.position.y = stand;
        state.velocity.y = 0.0;
        outcome.landed = !state.can_jump;
        state.can_jump = true;
    }

    outcome
}

/// Unit (or zero) direction derived from the latched intent.
fn horizontal_direction(character: &Character, scheme: ControlScheme) -> Vec3 {
    let intent = character.movement.intent;
    let along = axis(intent.forward, intent.backward);
    match scheme {
        ControlScheme::Strafe => {
            let side = axis(intent.right, intent.left);
            let local = Vec2::new(side, along).normalize_or_zero();
            character.forward() * local.y + character.right() * local.x
        }
        ControlScheme::Turn => character.forward() * along,
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Hard clamp on both horizontal axes.
pub fn clamp_to_world(position: &mut Vec3, half_extent: f32) {
    position.x = position.x.clamp(-half_extent, half_extent);
    position.z = position.z.clamp(-half_extent, half_extent);
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(a: f32) -> f32 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if w >= TAU { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Perspective;

    const HALF: f32 = 500.0;

    fn no_water() -> Rect {
        Rect::new(WorldPoint::new(10_000.0, 10_000.0), 1.0)
    }

    fn walker() -> (Character, MovementConfig) {
        let config = MovementConfig::default();
        (Character::standing_at(WorldPoint::new(0.0, 0.0), &config), config)
    }

    fn forward() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..MoveIntent::default()
        }
    }

    #[test]
    fn settles_onto_stand_height() {
        let (mut c, config) = walker();
        c.position.y = 1.69;
        c.movement.can_jump = false;
        let out = integrate(&mut c, MoveIntent::default(), &config, HALF, no_water(), 1.0 / 60.0);
        assert_eq!(c.position.y, 1.7);
        assert_eq!(c.movement.velocity.y, 0.0);
        assert!(c.movement.can_jump);
        assert!(out.landed);
    }

    #[test]
    fn zero_length_frame_keeps_character_grounded() {
        let (mut c, config) = walker();
        let jump = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        let out = integrate(&mut c, jump, &config, HALF, no_water(), 0.0);
        assert!(!out.jumped);
        assert!(!out.landed);
        assert_eq!(c.position.y, config.stand_height());
        assert_eq!(c.movement.velocity.y, 0.0);
        assert!(c.movement.can_jump);

        // The next real frame still jumps.
        let out = integrate(&mut c, jump, &config, HALF, no_water(), 1.0 / 60.0);
        assert!(out.jumped);
        assert!(c.position.y > config.stand_height());
    }

    #[test]
    fn at_stand_height_counts_as_ground() {
        let (mut c, config) = walker();
        c.movement.can_jump = false;
        c.movement.velocity.y = 0.0;
        let out = integrate(&mut c, MoveIntent::default(), &config, HALF, no_water(), 0.0);
        assert_eq!(c.position.y, config.stand_height());
        assert!(c.movement.can_jump);
        assert!(out.landed);
    }

    #[test]
    fn forward_moves_along_facing() {
        let (mut c, config) = walker();
        integrate(&mut c, forward(), &config, HALF, no_water(), 0.1);
        assert!((c.position.z - -1.0).abs() < 1e-5);
        assert!(c.position.x.abs() < 1e-5);
    }

    #[test]
    fn horizontal_velocity_is_not_accumulated() {
        let (mut c, config) = walker();
        integrate(&mut c, forward(), &config, HALF, no_water(), 0.1);
        let first = c.movement.velocity;
        integrate(&mut c, forward(), &config, HALF, no_water(), 0.1);
        assert_eq!(c.movement.velocity.x, first.x);
        assert_eq!(c.movement.velocity.z, first.z);
        integrate(&mut c, MoveIntent::default(), &config, HALF, no_water(), 0.1);
        assert_eq!(c.movement.velocity.x, 0.0);
        assert_eq!(c.movement.velocity.z, 0.0);
    }

    #[test]
    fn diagonal_strafe_is_normalized() {
        let (mut c, config) = walker();
        let intent = MoveIntent {
            forward: true,
            right: true,
            ..MoveIntent::default()
        };
        let out = integrate(&mut c, intent, &config, HALF, no_water(), 0.1);
        assert!((out.horizontal_distance - 1.0).abs() < 1e-5);
        assert!(c.position.x > 0.0 && c.position.z < 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let (mut c, config) = walker();
        let intent = MoveIntent {
            forward: true,
            backward: true,
            ..MoveIntent::default()
        };
        let out = integrate(&mut c, intent, &config, HALF, no_water(), 0.1);
        assert_eq!(out.horizontal_distance, 0.0);
    }

    #[test]
    fn water_halves_speed() {
        let (mut c, config) = walker();
        let water = Rect::new(WorldPoint::new(0.0, 0.0), 5.0);
        let out = integrate(&mut c, forward(), &config, HALF, water, 0.1);
        assert!(out.in_water);
        assert!((out.horizontal_distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn position_is_clamped_to_world() {
        let (mut c, config) = walker();
        c.position.z = -499.9;
        integrate(&mut c, forward(), &config, HALF, no_water(), 0.1);
        assert_eq!(c.position.z, -HALF);
        c.yaw = std::f32::consts::FRAC_PI_2;
        c.position.x = -499.95;
        integrate(&mut c, forward(), &config, HALF, no_water(), 0.1);
        assert_eq!(c.position.x, -HALF);
    }

    #[test]
    fn jump_leaves_ground_then_lands() {
        let (mut c, config) = walker();
        let jump = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        let out = integrate(&mut c, jump, &config, HALF, no_water(), 1.0 / 60.0);
        assert!(out.jumped);
        assert_eq!(c.movement.contact(), Contact::Airborne);
        assert!(c.position.y > config.stand_height());

        // A second jump in mid-air is ignored.
        let vy = c.movement.velocity.y;
        let out = integrate(&mut c, jump, &config, HALF, no_water(), 1.0 / 60.0);
        assert!(!out.jumped);
        assert!(c.movement.velocity.y < vy);

        let mut landed = false;
        for _ in 0..120 {
            let out = integrate(&mut c, MoveIntent::default(), &config, HALF, no_water(), 1.0 / 60.0);
            landed |= out.landed;
            assert!(c.position.y >= config.stand_height());
        }
        assert!(landed);
        assert_eq!(c.movement.contact(), Contact::Grounded);
    }

    #[test]
    fn turn_scheme_rotates_and_wraps() {
        let mut config = MovementConfig {
            scheme: ControlScheme::Turn,
            perspective: Perspective::ThirdPerson,
            ..MovementConfig::default()
        };
        config.rotation_speed = 2.0;
        let mut c = Character::standing_at(WorldPoint::new(0.0, 0.0), &config);
        assert_eq!(c.position.y, 0.85);

        let right = MoveIntent {
            right: true,
            ..MoveIntent::default()
        };
        integrate(&mut c, right, &config, HALF, no_water(), 0.1);
        assert!((c.yaw - (TAU - 0.2)).abs() < 1e-5);
        // Turning alone does not translate.
        assert_eq!(c.position.x, 0.0);
        assert_eq!(c.position.z, 0.0);

        for _ in 0..100 {
            integrate(&mut c, right, &config, HALF, no_water(), 0.1);
            assert!((0.0..TAU).contains(&c.yaw));
        }
    }

    #[test]
    fn turn_scheme_ignores_mouse_look() {
        let config = MovementConfig {
            scheme: ControlScheme::Turn,
            ..MovementConfig::default()
        };
        let mut c = Character::standing_at(WorldPoint::new(0.0, 0.0), &config);
        let look = MoveIntent {
            look_yaw: 1.0,
            ..MoveIntent::default()
        };
        integrate(&mut c, look, &config, HALF, no_water(), 0.1);
        assert_eq!(c.yaw, 0.0);
    }

    #[test]
    fn strafe_scheme_follows_mouse_look() {
        let (mut c, config) = walker();
        let look = MoveIntent {
            forward: true,
            look_yaw: std::f32::consts::FRAC_PI_2,
            ..MoveIntent::default()
        };
        integrate(&mut c, look, &config, HALF, no_water(), 0.1);
        // Facing -X after a quarter turn to the left.
        assert!((c.position.x - -1.0).abs() < 1e-5);
    }

    #[test]
    fn wrap_angle_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
    }
}
