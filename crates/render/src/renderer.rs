use std::fmt::Write as _;

use forestwalk_common::{Pose, Transform};
use forestwalk_kernel::{RigPose, Simulation};
use glam::{Mat4, Quat, Vec3};

use crate::camera::FollowCamera;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads simulation state and a camera, then produces output.
/// It never mutates the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given simulation state and camera.
    fn render(&self, sim: &Simulation, camera: &FollowCamera) -> Self::Output;
}

/// Everything a drawing backend needs for one frame, in world space.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub tick: u64,
    pub view_projection: Mat4,
    pub eye: Vec3,
    pub character: Transform,
    pub rig: RigPose,
    pub trees: Vec<Transform>,
    pub undergrowth: Vec<Transform>,
    /// One transform per wind element, in element order.
    pub elements: Vec<Transform>,
    pub wind_direction: [f32; 2],
    pub wind_strength: f32,
}

/// Captures a [`RenderFrame`] for instanced drawing.
#[derive(Debug, Default)]
pub struct FrameCapture;

impl FrameCapture {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for FrameCapture {
    type Output = RenderFrame;

    fn render(&self, sim: &Simulation, camera: &FollowCamera) -> RenderFrame {
        let forest = sim.forest();
        let character = sim.character();
        let wind = sim.wind();
        tracing::trace!(
            tick = sim.tick(),
            trees = forest.trees().len(),
            elements = sim.poses().len(),
            "capturing frame"
        );
        RenderFrame {
            tick: sim.tick(),
            view_projection: camera.view_projection(),
            eye: camera.eye,
            character: Transform {
                position: character.position,
                rotation: Quat::from_rotation_y(character.yaw),
                scale: Vec3::ONE,
            },
            rig: sim.rig().pose(),
            trees: forest.trees().iter().map(|t| t.transform()).collect(),
            undergrowth: forest.undergrowth().iter().map(|u| u.transform()).collect(),
            elements: sim.poses().iter().map(Pose::to_transform).collect(),
            wind_direction: wind.direction.to_array(),
            wind_strength: wind.strength(&sim.config().wind),
        }
    }
}

/// Debug text renderer.
///
/// Produces a human-readable dump of the simulation state. Used for CLI
/// output and for testing the render interface without a GPU.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Trees listed individually before the output is truncated.
    pub max_rows: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { max_rows: 8 }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation, camera: &FollowCamera) -> String {
        let forest = sim.forest();
        let c = sim.character();
        let wind = sim.wind();
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Forest (tick={}, seed={}, t={:.2}s) ===",
            sim.tick(),
            sim.seed(),
            sim.elapsed()
        );
        let _ = writeln!(
            out,
            "Trees: {}  Undergrowth: {}  Elements: {}",
            forest.trees().len(),
            forest.undergrowth().len(),
            forest.elements().len()
        );
        let _ = writeln!(
            out,
            "Character: pos=({:.2}, {:.2}, {:.2}) yaw={:.3} {:?}",
            c.position.x,
            c.position.y,
            c.position.z,
            c.yaw,
            c.movement.contact()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            camera.eye.x,
            camera.eye.y,
            camera.eye.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov.to_degrees()
        );
        let _ = writeln!(
            out,
            "Wind: dir=({:.2}, {:.2}) gust={:.3}->{:.3} strength={:.3}",
            wind.direction.x,
            wind.direction.y,
            wind.current_gust,
            wind.target_gust,
            wind.strength(&sim.config().wind)
        );

        for (i, tree) in forest.trees().iter().take(self.max_rows).enumerate() {
            let _ = writeln!(
                out,
                "  [{i:>4}] {:?} pos=({:.2}, {:.2}) scale={:.2} r={:.2}",
                tree.kind, tree.position.x, tree.position.z, tree.scale, tree.collision_radius
            );
        }
        let hidden = forest.trees().len().saturating_sub(self.max_rows);
        if hidden > 0 {
            let _ = writeln!(out, "  ... {hidden} more");
        }

        out
    }
}
