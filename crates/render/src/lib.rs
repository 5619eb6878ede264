//! Rendering Adapter: renderer-agnostic frame output.
//!
//! # Invariants
//! - Renderers read the simulation; they never mutate it.
//! - Everything a GPU backend needs per frame is derivable from
//!   [`Simulation`](forestwalk_kernel::Simulation) plus a [`FollowCamera`].

mod camera;
mod renderer;

pub use camera::{CameraMode, FollowCamera};
pub use renderer::{DebugTextRenderer, FrameCapture, RenderFrame, Renderer};

pub fn crate_info() -> &'static str {
    "forestwalk-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
