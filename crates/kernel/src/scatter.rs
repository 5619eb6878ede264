//! Rejection-sampled placement of forest entities.

use forestwalk_common::{Rect, WorldPoint};
use rand::Rng;

use crate::config::{ConfigError, WorldConfig};

/// Errors from world generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "gave up after {attempts} attempts on point {placed} of {requested}: exclusion zones leave no room"
    )]
    PlacementExhausted {
        placed: usize,
        requested: usize,
        attempts: u32,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where entities may land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterRules {
    pub half_extent: f32,
    pub min_center_distance: f32,
    pub lake: Rect,
    pub max_attempts: u32,
}

impl ScatterRules {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            half_extent: config.half_extent(),
            min_center_distance: config.clearing_radius,
            lake: config.lake(),
            max_attempts: config.max_placement_attempts,
        }
    }

    /// True if `p` is inside the world, outside the clearing and off the lake.
    pub fn accepts(&self, p: WorldPoint) -> bool {
        p.x.abs() <= self.half_extent
            && p.z.abs() <= self.half_extent
            && p.distance_from_origin() >= self.min_center_distance
            && !self.lake.contains(p)
    }
}

/// Place `count` points uniformly over the world square.
///
/// A rejected sample is retried for the same index, so the result always has
/// exactly `count` points. Each index gets at most `rules.max_attempts` samples.
pub fn place_entities<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    rules: &ScatterRules,
) -> Result<Vec<WorldPoint>, GenerateError> {
    let h = rules.half_extent;
    let mut points = Vec::with_capacity(count);
    let mut rejected: u64 = 0;

    for index in 0..count {
        let mut attempts = 0;
        let point = loop {
            if attempts == rules.max_attempts {
                return Err(GenerateError::PlacementExhausted {
                    placed: index,
                    requested: count,
                    attempts,
                });
            }
            attempts += 1;
            let candidate = WorldPoint::new(rng.gen_range(-h..=h), rng.gen_range(-h..=h));
            if rules.accepts(candidate) {
                break candidate;
            }
            rejected += 1;
        };
        points.push(point);
    }

    tracing::debug!(count, rejected, "placed entities");
    Ok(points)
}
