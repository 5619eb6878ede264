//! Fixed simulation constants.
//!
//! Every value is decided at process start; nothing here is reconfigured while
//! the simulation runs. The serde derives exist so the active constants can be
//! dumped for inspection or loaded from a file at startup; missing fields take
//! their defaults.

use forestwalk_common::{Rect, WorldPoint};
use serde::{Deserialize, Serialize};

/// Errors raised when a configuration cannot produce a usable world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
    #[error("clearing radius {radius} leaves no room in a world of size {size}")]
    ExclusionCoversWorld { radius: f32, size: f32 },
    #[error("gust duration range [{min}, {max}) is empty")]
    EmptyGustRange { min: f32, max: f32 },
}

/// How left/right input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    /// Left/right strafe relative to the facing; facing follows mouse look.
    #[default]
    Strafe,
    /// Left/right rotate the facing at a fixed rate; forward/back walk along it.
    Turn,
}

/// Where the tracked point sits on the character's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// The tracked point is the eye, so it stands at full character height.
    #[default]
    FirstPerson,
    /// The tracked point is the body center, at half character height.
    ThirdPerson,
}

/// Ground plane, scatter counts and exclusion zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square ground plane.
    pub size: f32,
    pub tree_count: usize,
    pub undergrowth_count: usize,
    /// No tree or undergrowth is placed closer than this to the origin.
    pub clearing_radius: f32,
    /// Rejection-sampling retries allowed per point before giving up.
    pub max_placement_attempts: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 1000.0,
            tree_count: 300,
            undergrowth_count: 600,
            clearing_radius: 10.0,
            max_placement_attempts: 10_000,
        }
    }
}

impl WorldConfig {
    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    /// Lake footprint: centered at `(0, -S/4)` with half-size `S/6`.
    pub fn lake(&self) -> Rect {
        Rect::new(WorldPoint::new(0.0, -self.size / 4.0), self.size / 6.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.size", self.size)?;
        non_negative("world.clearing_radius", self.clearing_radius)?;
        // The farthest in-world point from the origin is a corner.
        if self.clearing_radius >= self.half_extent() * std::f32::consts::SQRT_2 {
            return Err(ConfigError::ExclusionCoversWorld {
                radius: self.clearing_radius,
                size: self.size,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                field: "world.max_placement_attempts",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Character movement constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub scheme: ControlScheme,
    pub perspective: Perspective,
    /// Horizontal speed in units per second.
    pub speed: f32,
    pub character_height: f32,
    /// Collision circle radius of the character.
    pub character_radius: f32,
    pub gravity: f32,
    pub jump_force: f32,
    /// Turn rate for [`ControlScheme::Turn`], radians per second.
    pub rotation_speed: f32,
    /// Speed multiplier while standing in the water footprint.
    pub water_speed_factor: f32,
    /// Upper bound applied to every frame delta.
    pub max_frame_dt: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            scheme: ControlScheme::Strafe,
            perspective: Perspective::FirstPerson,
            speed: 10.0,
            character_height: 1.7,
            character_radius: 0.5,
            gravity: 30.0,
            jump_force: 10.0,
            rotation_speed: 2.0,
            water_speed_factor: 0.5,
            max_frame_dt: 0.1,
        }
    }
}

impl MovementConfig {
    /// Height of the tracked point when touching the ground.
    pub fn stand_height(&self) -> f32 {
        match self.perspective {
            Perspective::FirstPerson => self.character_height,
            Perspective::ThirdPerson => self.character_height / 2.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("movement.speed", self.speed)?;
        positive("movement.character_height", self.character_height)?;
        positive("movement.max_frame_dt", self.max_frame_dt)?;
        non_negative("movement.character_radius", self.character_radius)?;
        non_negative("movement.gravity", self.gravity)?;
        non_negative("movement.jump_force", self.jump_force)?;
        non_negative("movement.rotation_speed", self.rotation_speed)?;
        if self.water_speed_factor <= 0.0 || !(..=1.0).contains(&self.water_speed_factor) {
            return Err(ConfigError::OutOfRange {
                field: "movement.water_speed_factor",
                requirement: "in (0, 1]",
                value: self.water_speed_factor,
            });
        }
        Ok(())
    }
}

/// Wind and gust constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Base sway strength before gusts.
    pub strength: f32,
    /// Phase advance per second.
    pub speed: f32,
    /// Gust targets are drawn from `[0, max_gust)`.
    pub max_gust: f32,
    pub gust_duration_min: f32,
    pub gust_duration_max: f32,
    /// Fraction of the remaining gap closed per second of simulated time.
    pub gust_response: f32,
    /// Probability that a gust cycle also shifts the wind direction.
    pub direction_change_chance: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            strength: 1.0,
            speed: 1.0,
            max_gust: 1.0,
            gust_duration_min: 3.0,
            gust_duration_max: 8.0,
            gust_response: 0.5,
            direction_change_chance: 0.2,
        }
    }
}

impl WindConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("wind.strength", self.strength)?;
        non_negative("wind.speed", self.speed)?;
        positive("wind.max_gust", self.max_gust)?;
        positive("wind.gust_duration_min", self.gust_duration_min)?;
        positive("wind.gust_duration_max", self.gust_duration_max)?;
        positive("wind.gust_response", self.gust_response)?;
        if self.gust_duration_min >= self.gust_duration_max {
            return Err(ConfigError::EmptyGustRange {
                min: self.gust_duration_min,
                max: self.gust_duration_max,
            });
        }
        if !(0.0..=1.0).contains(&self.direction_change_chance) {
            return Err(ConfigError::OutOfRange {
                field: "wind.direction_change_chance",
                requirement: "in [0, 1]",
                value: self.direction_change_chance,
            });
        }
        Ok(())
    }
}

/// Every constant the simulation consumes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub movement: MovementConfig,
    pub wind: WindConfig,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.movement.validate()?;
        self.wind.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement: "positive and finite",
            value,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement: "non-negative and finite",
            value,
        })
    }
}
