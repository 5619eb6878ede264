use forestwalk_common::{MoveIntent, Pose, WorldPoint};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::collision;
use crate::config::{ConfigError, SimConfig};
use crate::forest::Forest;
use crate::movement::{self, Character, Contact};
use crate::rig::CharacterRig;
use crate::scatter::GenerateError;
use crate::wind::WindState;

/// An event record produced by notable state changes during stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Jumped { tick: u64 },
    Landed { tick: u64 },
    /// Character started pushing against a new tree (index into the forest).
    Collided { tick: u64, tree: usize },
    EnteredWater { tick: u64 },
    LeftWater { tick: u64 },
    /// A new gust cycle began.
    GustRolled {
        tick: u64,
        target: f32,
        duration: f32,
        direction_changed: bool,
    },
}

/// Summary of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    /// Delta actually simulated, after clamping.
    pub dt: f32,
    pub contact: Contact,
    pub collided_with: Option<usize>,
    pub in_water: bool,
}

/// The whole simulation state.
///
/// Owns the forest, the character, and the wind. Each call to [`step`]
/// advances one frame; given the same seed and the same sequence of intents
/// and deltas, the resulting states are identical.
///
/// [`step`]: Simulation::step
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    forest: Forest,
    character: Character,
    rig: CharacterRig,
    wind: WindState,
    /// Current pose of every forest element, parallel to `forest.elements()`.
    poses: Vec<Pose>,
    rng: ChaCha8Rng,
    seed: u64,
    tick: u64,
    elapsed: f64,
    in_water: bool,
    touching: Option<usize>,
    /// Append-only event log.
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Validate `config`, generate the forest from `seed`, and stand the
    /// character in the clearing at the origin.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, GenerateError> {
        config.validate()?;
        let forest = Forest::generate(&config.world, seed)?;
        Ok(Self::assemble(config, forest, seed))
    }

    /// Run on a prebuilt forest.
    pub fn with_forest(config: SimConfig, forest: Forest, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, forest, seed))
    }

    fn assemble(config: SimConfig, forest: Forest, seed: u64) -> Self {
        let character = Character::standing_at(WorldPoint::default(), &config.movement);
        let wind = WindState::default();
        let poses = forest.elements().iter().map(|e| e.rest).collect();
        Self {
            character,
            rig: CharacterRig::default(),
            wind,
            poses,
            // Wind draws from its own stream so it never perturbs generation.
            rng: ChaCha8Rng::seed_from_u64(splitmix64(seed)),
            seed,
            tick: 0,
            elapsed: 0.0,
            in_water: false,
            touching: None,
            events: Vec::new(),
            config,
            forest,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn rig(&self) -> &CharacterRig {
        &self.rig
    }

    pub fn wind(&self) -> &WindState {
        &self.wind
    }

    /// Element poses for the current frame, parallel to `forest().elements()`.
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Whether the last frame started inside the water zone. Matches the
    /// `EnteredWater`/`LeftWater` events.
    pub fn in_water(&self) -> bool {
        self.in_water
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Teleport the character, keeping its facing. Velocity is reset.
    pub fn place_character(&mut self, position: Vec3) {
        self.character.position = position;
        self.character.movement.velocity = Vec3::ZERO;
        self.character.movement.can_jump = position.y <= self.config.movement.stand_height();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.character.yaw = movement::wrap_angle(yaw);
    }

    /// Advance one frame: integrate movement, resolve collisions, clamp, then
    /// animate the rig and the wind.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]`; non-finite deltas count as zero.
    pub fn step(&mut self, intent: MoveIntent, dt: f32) -> FrameReport {
        let tick = self.tick + 1;
        let _span = tracing::info_span!("sim_step", tick).entered();
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.movement.max_frame_dt)
        } else {
            0.0
        };

        let outcome = movement::integrate(
            &mut self.character,
            intent,
            &self.config.movement,
            self.forest.half_extent(),
            self.forest.lake(),
            dt,
        );

        let hit = collision::resolve(
            &mut self.character.position,
            self.config.movement.character_radius,
            self.forest.obstacles(),
        );
        movement::clamp_to_world(&mut self.character.position, self.forest.half_extent());

        if outcome.jumped {
            self.events.push(SimEvent::Jumped { tick });
        }
        if outcome.landed {
            self.events.push(SimEvent::Landed { tick });
        }
        if let Some(tree) = hit
            && self.touching != hit
        {
            tracing::debug!(tree, "bumped into tree");
            self.events.push(SimEvent::Collided { tick, tree });
        }
        self.touching = hit;
        if outcome.in_water != self.in_water {
            self.events.push(if outcome.in_water {
                SimEvent::EnteredWater { tick }
            } else {
                SimEvent::LeftWater { tick }
            });
            self.in_water = outcome.in_water;
        }

        self.rig.update(outcome.horizontal_distance, dt);

        if let Some(roll) = self.wind.advance(&self.config.wind, dt, &mut self.rng) {
            tracing::debug!(
                gust_target = roll.target,
                duration = roll.duration,
                direction_changed = roll.direction_changed,
                "gust rolled"
            );
            self.events.push(SimEvent::GustRolled {
                tick,
                target: roll.target,
                duration: roll.duration,
                direction_changed: roll.direction_changed,
            });
        }
        let strength = self.wind.strength(&self.config.wind);
        for (pose, element) in self.poses.iter_mut().zip(self.forest.elements()) {
            *pose = element.pose(&self.wind, strength);
        }

        self.tick = tick;
        self.elapsed += f64::from(dt);

        let report = FrameReport {
            tick,
            dt,
            contact: self.character.movement.contact(),
            collided_with: hit,
            in_water: outcome.in_water,
        };
        tracing::trace!(
            x = self.character.position.x,
            y = self.character.position.y,
            z = self.character.position.z,
            contact = ?report.contact,
            "frame complete"
        );
        report
    }

    /// Deterministic digest of the dynamic state, for comparing runs.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let c = &self.character;
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        for v in [
            c.position.x,
            c.position.y,
            c.position.z,
            c.yaw,
            c.movement.velocity.x,
            c.movement.velocity.y,
            c.movement.velocity.z,
            self.wind.phase,
            self.wind.direction.x,
            self.wind.direction.y,
            self.wind.current_gust,
            self.wind.target_gust,
            self.rig.walk_phase,
        ] {
            mix(&mut h, &v.to_le_bytes());
        }
        mix(&mut h, &[u8::from(c.movement.can_jump)]);
        h
    }
}

/// Splitmix64: derives an independent RNG stream seed from the world seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
