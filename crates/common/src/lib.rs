//! Shared types for the forestwalk simulator.

mod types;

pub use types::{MoveIntent, Pose, Rect, Transform, WorldPoint};
