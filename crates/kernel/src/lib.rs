//! Forest simulation kernel: world scatter, movement, collision, wind, and
//! deterministic frame stepping.
//!
//! # Invariants
//! - All simulation state lives in [`Simulation`]; there is no global state.
//! - After every step the character stands at or above its stand height and
//!   inside the world square.
//! - Element poses are recomputed from captured rest poses, never integrated.

pub mod collision;
pub mod config;
pub mod forest;
pub mod movement;
pub mod rig;
pub mod scatter;
pub mod sim;
pub mod wind;

pub use collision::Obstacle;
pub use config::{
    ConfigError, ControlScheme, MovementConfig, Perspective, SimConfig, WindConfig, WorldConfig,
};
pub use forest::{Forest, Tree, TreeKind, UndergrowthItem, UndergrowthKind};
pub use movement::{Character, Contact, MovementState};
pub use rig::{CharacterRig, RigPose};
pub use scatter::{GenerateError, ScatterRules, place_entities};
pub use sim::{FrameReport, SimEvent, Simulation};
pub use wind::{SwayKind, WindElement, WindState};
