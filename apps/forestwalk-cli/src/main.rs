use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use forestwalk_input::{InputScript, InputState};
use forestwalk_kernel::{
    ControlScheme, Forest, Perspective, SimConfig, Simulation, TreeKind, UndergrowthKind,
};
use forestwalk_render::{DebugTextRenderer, FollowCamera, Renderer};
use forestwalk_tools::{FrameTimer, SimInspector};
use tracing_subscriber::EnvFilter;

const DEFAULT_SCRIPT: &str = "forward=180 forward+left=60 jump forward=120 right=45 forward=120 idle=30";

#[derive(Parser)]
#[command(name = "forestwalk-cli", about = "Headless runner for the forest walking simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; missing fields take their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a forest and print placement statistics
    Generate {
        /// RNG seed for placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Walk a scripted route through a generated forest
    Walk {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// RNG seed for generation and wind
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Input script, e.g. "forward=120 forward+left=30 jump idle=60"
        #[arg(long, default_value = DEFAULT_SCRIPT)]
        script: String,
        /// Horizontal pointer motion per frame, in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        look: f32,
        /// Override the configured control scheme
        #[arg(long, value_enum)]
        scheme: Option<SchemeArg>,
        /// Override the configured camera perspective
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
        /// Print the debug text render of the final frame
        #[arg(long)]
        render: bool,
        /// Print every recorded event
        #[arg(long)]
        events: bool,
    },
    /// Print the active configuration as YAML
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemeArg {
    Strafe,
    Turn,
}

impl From<SchemeArg> for ControlScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Strafe => ControlScheme::Strafe,
            SchemeArg::Turn => ControlScheme::Turn,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    First,
    Third,
}

impl From<ViewArg> for Perspective {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::First => Perspective::FirstPerson,
            ViewArg::Third => Perspective::ThirdPerson,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("forestwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", forestwalk_input::crate_info());
            println!("render: {}", forestwalk_render::crate_info());
            println!("tools: {}", forestwalk_tools::crate_info());
            println!(
                "world: size={} trees={} undergrowth={}",
                config.world.size, config.world.tree_count, config.world.undergrowth_count
            );
        }
        Commands::Generate { seed, json } => {
            let started = Instant::now();
            let forest = Forest::generate(&config.world, seed)?;
            let stats = ForestStats::of(&forest);
            tracing::info!(seed, elapsed = ?started.elapsed(), "generation finished");
            if json {
                println!("{}", serde_json::to_string_pretty(&stats.to_json(seed))?);
            } else {
                println!("Forest seed={seed} size={}", forest.size());
                println!("{stats}");
            }
        }
        Commands::Walk {
            ticks,
            seed,
            fps,
            script,
            look,
            scheme,
            view,
            json,
            render,
            events,
        } => {
            anyhow::ensure!(fps > 0.0 && fps.is_finite(), "--fps must be positive");
            let script: InputScript = script.parse().context("parsing --script")?;
            let mut config = config;
            if let Some(scheme) = scheme {
                config.movement.scheme = scheme.into();
            }
            if let Some(view) = view {
                config.movement.perspective = view.into();
            }
            let perspective = config.movement.perspective;

            let mut sim = Simulation::new(config, seed)?;
            let timer = walk(&mut sim, &script, ticks, 1.0 / fps, look);

            if json {
                println!("{}", SimInspector::summary(&sim).to_json()?);
            } else {
                println!("{}", SimInspector::summary(&sim));
                if let Some(tree) = SimInspector::nearest_tree(&sim) {
                    println!("  nearest: {tree}");
                }
                println!(
                    "  frames: avg={:?} max={:?} over_budget={}",
                    timer.average(),
                    timer.max(),
                    timer.over_budget()
                );
            }
            if events {
                for event in sim.events() {
                    println!("{event:?}");
                }
            }
            if render {
                let mut camera = FollowCamera::for_perspective(perspective);
                camera.follow(sim.character());
                print!("{}", DebugTextRenderer::new().render(&sim, &camera));
            }
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("loading config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn parse_config(text: &str) -> anyhow::Result<SimConfig> {
    let config: SimConfig = serde_yaml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Drive `sim` through `ticks` frames of scripted input at a fixed delta.
fn walk(sim: &mut Simulation, script: &InputScript, ticks: u64, dt: f32, look: f32) -> FrameTimer {
    let _span = tracing::info_span!("walk", ticks, dt).entered();
    let mut input = InputState::default();
    input.set_pointer_lock(true);
    let mut timer = FrameTimer::new(120);

    for frame in 0..ticks {
        let started = Instant::now();
        input.hold_exactly(script.actions_at(frame));
        if look != 0.0 {
            input.mouse_moved(look);
        }
        let intent = input.take_intent();
        sim.step(intent, dt);
        timer.record(started.elapsed());
    }

    tracing::info!(
        ticks,
        events = sim.events().len(),
        avg = ?timer.average(),
        "walk finished"
    );
    timer
}

/// Placement statistics for `generate`.
struct ForestStats {
    pines: usize,
    broadleaves: usize,
    grass: usize,
    bushes: usize,
    elements: usize,
    /// Distance from the origin to the nearest trunk center.
    clearing: f32,
    mean_scale: f32,
}

impl ForestStats {
    fn of(forest: &Forest) -> Self {
        let trees = forest.trees();
        let pines = trees.iter().filter(|t| t.kind == TreeKind::Pine).count();
        let grass = forest
            .undergrowth()
            .iter()
            .filter(|u| u.kind == UndergrowthKind::Grass)
            .count();
        let clearing = trees
            .iter()
            .map(|t| t.position.distance_from_origin())
            .fold(f32::INFINITY, f32::min);
        let mean_scale = if trees.is_empty() {
            0.0
        } else {
            trees.iter().map(|t| t.scale).sum::<f32>() / trees.len() as f32
        };
        Self {
            pines,
            broadleaves: trees.len() - pines,
            grass,
            bushes: forest.undergrowth().len() - grass,
            elements: forest.elements().len(),
            clearing,
            mean_scale,
        }
    }

    fn to_json(&self, seed: u64) -> serde_json::Value {
        serde_json::json!({
            "seed": seed,
            "pines": self.pines,
            "broadleaves": self.broadleaves,
            "grass": self.grass,
            "bushes": self.bushes,
            "elements": self.elements,
            "clearing": self.clearing.is_finite().then_some(self.clearing),
            "mean_scale": self.mean_scale,
        })
    }
}

impl std::fmt::Display for ForestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  trees: {} pine, {} broadleaf", self.pines, self.broadleaves)?;
        writeln!(f, "  undergrowth: {} grass, {} bush", self.grass, self.bushes)?;
        writeln!(f, "  wind elements: {}", self.elements)?;
        write!(
            f,
            "  nearest trunk to origin: {:.2}  mean scale: {:.3}",
            self.clearing, self.mean_scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use forestwalk_kernel::WorldConfig;

    fn small_config() -> SimConfig {
        SimConfig {
            world: WorldConfig {
                size: 200.0,
                tree_count: 20,
                undergrowth_count: 30,
                ..WorldConfig::default()
            },
            ..SimConfig::default()
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn walk_flags_parse() {
        let cli = Cli::parse_from([
            "forestwalk-cli",
            "walk",
            "--ticks",
            "10",
            "--scheme",
            "turn",
            "--view",
            "third",
            "--look",
            "-3",
        ]);
        match cli.command {
            Commands::Walk {
                ticks, scheme, look, ..
            } => {
                assert_eq!(ticks, 10);
                assert!(matches!(scheme, Some(SchemeArg::Turn)));
                assert_eq!(look, -3.0);
            }
            _ => panic!("expected walk"),
        }
    }

    #[test]
    fn partial_config_takes_defaults() {
        let config = parse_config("world:\n  tree_count: 12\nwind:\n  strength: 2.5\n").unwrap();
        assert_eq!(config.world.tree_count, 12);
        assert_eq!(config.world.size, WorldConfig::default().size);
        assert_eq!(config.wind.strength, 2.5);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(parse_config("world:\n  size: -5\n").is_err());
        assert!(parse_config("movement: [1, 2]\n").is_err());
    }

    #[test]
    fn config_dump_parses_back() {
        let yaml = serde_yaml::to_string(&SimConfig::default()).unwrap();
        assert_eq!(parse_config(&yaml).unwrap(), SimConfig::default());
    }

    #[test]
    fn scripted_walk_moves_the_character() {
        let mut sim = Simulation::new(small_config(), 5).unwrap();
        let script: InputScript = "forward=30".parse().unwrap();
        let timer = walk(&mut sim, &script, 30, 1.0 / 60.0, 0.0);
        assert_eq!(sim.tick(), 30);
        assert_eq!(timer.total_frames(), 30);
        assert!(sim.character().position.z < 0.0);
    }

    #[test]
    fn walks_are_reproducible() {
        let script: InputScript = DEFAULT_SCRIPT.parse().unwrap();
        let mut a = Simulation::new(small_config(), 9).unwrap();
        let mut b = Simulation::new(small_config(), 9).unwrap();
        walk(&mut a, &script, 240, 1.0 / 60.0, 2.0);
        walk(&mut b, &script, 240, 1.0 / 60.0, 2.0);
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn forest_stats_partition_counts() {
        let forest = Forest::generate(&small_config().world, 1).unwrap();
        let stats = ForestStats::of(&forest);
        assert_eq!(stats.pines + stats.broadleaves, 20);
        assert_eq!(stats.grass + stats.bushes, 30);
        assert!(stats.clearing > small_config().world.clearing_radius);
    }
}
