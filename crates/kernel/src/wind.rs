//! Wind phase, gust drift, and per-element sway poses.
//!
//! Element poses are a pure function of the element's rest pose and the
//! current [`WindState`]; nothing is integrated frame over frame, so any frame
//! can be recomputed from scratch.

use forestwalk_common::Pose;
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WindConfig;

/// Phase spacing between consecutive elements so neighbours do not sway in lockstep.
const INDEX_PHASE_STEP: f32 = 0.37;

/// Global wind state, advanced once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    pub phase: f32,
    /// Unit vector on the XZ plane (`y` holds world Z).
    pub direction: Vec2,
    pub current_gust: f32,
    pub target_gust: f32,
    pub gust_timer: f32,
    pub gust_duration: f32,
}

impl Default for WindState {
    fn default() -> Self {
        Self {
            phase: 0.0,
            direction: Vec2::X,
            current_gust: 0.0,
            target_gust: 0.0,
            gust_timer: 0.0,
            gust_duration: 5.0,
        }
    }
}

/// A freshly rolled gust cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GustRoll {
    pub target: f32,
    pub duration: f32,
    pub direction_changed: bool,
}

impl WindState {
    /// Advance phase and gust by `dt` seconds. Returns the new gust cycle when
    /// the previous one ran out.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        config: &WindConfig,
        dt: f32,
        rng: &mut R,
    ) -> Option<GustRoll> {
        let dt = dt.max(0.0);
        self.phase += dt * config.speed;

        // First-order lag: never steps past the target.
        let k = (dt * config.gust_response).min(1.0);
        self.current_gust += (self.target_gust - self.current_gust) * k;

        self.gust_timer += dt;
        if self.gust_timer < self.gust_duration {
            return None;
        }

        self.gust_timer = 0.0;
        self.target_gust = rng.gen_range(0.0..config.max_gust);
        self.gust_duration = rng.gen_range(config.gust_duration_min..config.gust_duration_max);
        let direction_changed = rng.gen_bool(f64::from(config.direction_change_chance));
        if direction_changed {
            let nudge = Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5));
            self.direction = (self.direction + nudge)
                .try_normalize()
                .unwrap_or(self.direction);
        }

        Some(GustRoll {
            target: self.target_gust,
            duration: self.gust_duration,
            direction_changed,
        })
    }

    /// Effective sway strength: base strength boosted by the current gust.
    pub fn strength(&self, config: &WindConfig) -> f32 {
        config.strength * (1.0 + self.current_gust)
    }
}

/// What part of the vegetation an element is; selects its sway profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwayKind {
    Trunk,
    Branch,
    Leaf,
    GrassBlade,
    /// Whole bush, swayed as one rigid body.
    Bush,
}

#[derive(Debug, Clone, Copy)]
struct SwayProfile {
    amplitude: f32,
    frequency: f32,
    flutter: f32,
    drift: f32,
}

impl SwayKind {
    fn profile(self) -> SwayProfile {
        let (amplitude, frequency, flutter, drift) = match self {
            SwayKind::Trunk => (0.01, 0.5, 0.0, 0.0),
            SwayKind::Branch => (0.03, 0.8, 0.0, 0.0),
            SwayKind::Leaf => (0.06, 1.0, 0.02, 0.05),
            SwayKind::GrassBlade => (0.2, 1.5, 0.0, 0.0),
            SwayKind::Bush => (0.04, 0.7, 0.0, 0.0),
        };
        SwayProfile {
            amplitude,
            frequency,
            flutter,
            drift,
        }
    }
}

/// An animatable piece of vegetation with its rest pose captured at
/// generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindElement {
    pub kind: SwayKind,
    pub rest: Pose,
    pub index: u32,
    /// Per-element response scale in `[0.5, 1.4)`.
    pub wind_factor: f32,
    pub jitter_phase: f32,
    pub jitter_amplitude: f32,
}

impl WindElement {
    pub fn new<R: Rng + ?Sized>(kind: SwayKind, rest: Pose, index: u32, rng: &mut R) -> Self {
        Self {
            kind,
            rest,
            index,
            wind_factor: rng.gen_range(0.5..1.4),
            jitter_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            jitter_amplitude: rng.gen_range(0.02..0.08),
        }
    }

    /// Pose for the given wind state and effective strength.
    pub fn pose(&self, wind: &WindState, strength: f32) -> Pose {
        let p = self.kind.profile();
        let t = wind.phase * p.frequency + self.index as f32 * INDEX_PHASE_STEP;
        let sway = t.sin() * strength * p.amplitude * self.wind_factor;

        // Bend about the horizontal axis perpendicular to the wind.
        let mut rotation = self.rest.rotation
            + Vec3::new(wind.direction.y * sway, 0.0, -wind.direction.x * sway);
        let mut position = self.rest.position;

        match self.kind {
            SwayKind::Leaf => {
                let flutter = (t * 4.0 + self.jitter_phase).sin()
                    * p.flutter
                    * strength
                    * self.wind_factor;
                rotation += Vec3::new(flutter, flutter * 0.5, -flutter);
                position += Vec3::new(wind.direction.x, 0.0, wind.direction.y) * sway * p.drift;
            }
            SwayKind::GrassBlade => {
                let jitter =
                    (wind.phase * 3.1 + self.jitter_phase).sin() * self.jitter_amplitude * strength;
                rotation += Vec3::new(jitter, 0.0, jitter * 0.5);
            }
            SwayKind::Trunk | SwayKind::Branch | SwayKind::Bush => {}
        }

        Pose::new(position, rotation)
    }
}
