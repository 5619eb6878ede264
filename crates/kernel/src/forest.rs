//! Procedural forest: trees, undergrowth, and their animatable elements.

use std::f32::consts::TAU;

use forestwalk_common::{Pose, Rect, Transform, WorldPoint};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::collision::Obstacle;
use crate::config::WorldConfig;
use crate::scatter::{GenerateError, ScatterRules, place_entities};
use crate::wind::{SwayKind, WindElement};

/// Collision radius per unit of tree scale.
const TRUNK_RADIUS_PER_SCALE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeKind {
    Pine,
    Broadleaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub position: WorldPoint,
    pub kind: TreeKind,
    pub scale: f32,
    pub yaw: f32,
    pub collision_radius: f32,
}

impl Tree {
    pub fn new(position: WorldPoint, kind: TreeKind, scale: f32, yaw: f32) -> Self {
        Self {
            position,
            kind,
            scale,
            yaw,
            collision_radius: scale * TRUNK_RADIUS_PER_SCALE,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position.at_height(0.0))
            .with_yaw(self.yaw)
            .with_uniform_scale(self.scale)
    }

    pub fn obstacle(&self) -> Obstacle {
        Obstacle {
            center: self.position,
            radius: self.collision_radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndergrowthKind {
    Grass,
    Bush,
}

/// Ground cover. Not collidable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UndergrowthItem {
    pub position: WorldPoint,
    pub kind: UndergrowthKind,
    pub scale: f32,
}

impl UndergrowthItem {
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position.at_height(0.0)).with_uniform_scale(self.scale)
    }
}

/// Everything placed in the world at generation time. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    size: f32,
    lake: Rect,
    trees: Vec<Tree>,
    undergrowth: Vec<UndergrowthItem>,
    obstacles: Vec<Obstacle>,
    elements: Vec<WindElement>,
}

impl Forest {
    /// Scatter trees and undergrowth and build their wind elements.
    ///
    /// The same `config` and `seed` always produce the same forest.
    pub fn generate(config: &WorldConfig, seed: u64) -> Result<Self, GenerateError> {
        config.validate()?;
        let _span = tracing::info_span!("forest_generate", seed).entered();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rules = ScatterRules::from_config(config);

        let trees: Vec<Tree> = place_entities(&mut rng, config.tree_count, &rules)?
            .into_iter()
            .map(|position| {
                let kind = if rng.gen_bool(0.5) {
                    TreeKind::Pine
                } else {
                    TreeKind::Broadleaf
                };
                Tree::new(position, kind, rng.gen_range(0.8..1.6), rng.gen_range(0.0..TAU))
            })
            .collect();

        let undergrowth: Vec<UndergrowthItem> =
            place_entities(&mut rng, config.undergrowth_count, &rules)?
                .into_iter()
                .map(|position| UndergrowthItem {
                    position,
                    kind: if rng.gen_bool(0.7) {
                        UndergrowthKind::Grass
                    } else {
                        UndergrowthKind::Bush
                    },
                    scale: rng.gen_range(0.6..1.4),
                })
                .collect();

        let forest = Self::assemble(config, trees, undergrowth, &mut rng);
        tracing::debug!(
            trees = forest.trees.len(),
            undergrowth = forest.undergrowth.len(),
            elements = forest.elements.len(),
            "forest generated"
        );
        Ok(forest)
    }

    /// Build a forest from hand-placed trees and undergrowth. Element
    /// variation is drawn from `seed`.
    pub fn from_parts(
        config: &WorldConfig,
        trees: Vec<Tree>,
        undergrowth: Vec<UndergrowthItem>,
        seed: u64,
    ) -> Self {
        Self::assemble(config, trees, undergrowth, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn assemble(
        config: &WorldConfig,
        trees: Vec<Tree>,
        undergrowth: Vec<UndergrowthItem>,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut elements = ElementBuilder::new(rng);
        for tree in &trees {
            elements.tree(tree);
        }
        for item in &undergrowth {
            elements.undergrowth(item);
        }
        let obstacles = trees.iter().map(Tree::obstacle).collect();
        Self {
            size: config.size,
            lake: config.lake(),
            trees,
            undergrowth,
            obstacles,
            elements: elements.finish(),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    /// Water footprint; slows movement.
    pub fn lake(&self) -> Rect {
        self.lake
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn undergrowth(&self) -> &[UndergrowthItem] {
        &self.undergrowth
    }

    /// Trunk collision circles, in tree order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn elements(&self) -> &[WindElement] {
        &self.elements
    }
}

struct ElementBuilder<'a> {
    rng: &'a mut ChaCha8Rng,
    elements: Vec<WindElement>,
}

impl<'a> ElementBuilder<'a> {
    fn new(rng: &'a mut ChaCha8Rng) -> Self {
        Self {
            rng,
            elements: Vec::new(),
        }
    }

    fn push(&mut self, kind: SwayKind, position: Vec3, rotation: Vec3) {
        let index = self.elements.len() as u32;
        let element = WindElement::new(kind, Pose::new(position, rotation), index, &mut *self.rng);
        self.elements.push(element);
    }

    fn tree(&mut self, tree: &Tree) {
        let s = tree.scale;
        let base = tree.position.at_height(0.0);
        match tree.kind {
            TreeKind::Pine => {
                self.push(SwayKind::Trunk, base + Vec3::Y * 3.0 * s, Vec3::new(0.0, tree.yaw, 0.0));
                let tiers = self.rng.gen_range(3..=5);
                for i in 0..tiers {
                    let y = (2.5 + i as f32 * 1.2) * s;
                    self.push(
                        SwayKind::Leaf,
                        base + Vec3::Y * y,
                        Vec3::new(0.0, tree.yaw + i as f32 * 0.4, 0.0),
                    );
                }
            }
            TreeKind::Broadleaf => {
                self.push(SwayKind::Trunk, base + Vec3::Y * 2.5 * s, Vec3::new(0.0, tree.yaw, 0.0));
                let branches = self.rng.gen_range(3..=5);
                for b in 0..branches {
                    let angle = tree.yaw + b as f32 * TAU / branches as f32;
                    let out = Vec3::new(angle.cos(), 0.0, angle.sin());
                    let height = (3.0 + b as f32 * 0.4) * s;
                    self.push(
                        SwayKind::Branch,
                        base + out * 0.8 * s + Vec3::Y * height,
                        Vec3::new(0.0, -angle, 0.9),
                    );
                    self.push(
                        SwayKind::Leaf,
                        base + out * 2.0 * s + Vec3::Y * (height + 0.8 * s),
                        Vec3::new(0.0, angle, 0.0),
                    );
                }
            }
        }
    }

    fn undergrowth(&mut self, item: &UndergrowthItem) {
        let base = item.position.at_height(0.0);
        match item.kind {
            UndergrowthKind::Grass => {
                let blades = self.rng.gen_range(3..=6);
                for _ in 0..blades {
                    let offset = Vec3::new(
                        self.rng.gen_range(-0.3..0.3),
                        0.25 * item.scale,
                        self.rng.gen_range(-0.3..0.3),
                    );
                    let lean = Vec3::new(
                        self.rng.gen_range(-0.15..0.15),
                        self.rng.gen_range(0.0..TAU),
                        self.rng.gen_range(-0.15..0.15),
                    );
                    self.push(SwayKind::GrassBlade, base + offset, lean);
                }
            }
            UndergrowthKind::Bush => {
                let yaw = self.rng.gen_range(0.0..TAU);
                self.push(
                    SwayKind::Bush,
                    base + Vec3::Y * 0.5 * item.scale,
                    Vec3::new(0.0, yaw, 0.0),
                );
            }
        }
    }

    fn finish(self) -> Vec<WindElement> {
        self.elements
    }
}
