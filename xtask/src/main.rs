use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for forestwalk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, smoke
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Generate a forest and walk the default route with the CLI
    Smoke {
        /// Seed passed to the CLI
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Run the kernel step benchmark in release mode
    Bench,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
            run_smoke(42)?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => run_build()?,
        Commands::Smoke { seed } => run_smoke(seed)?,
        Commands::Bench => run_bench()?,
    }

    Ok(())
}

/// Run `cargo` with `args`, failing with `what` if it exits non-zero.
fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests() -> Result<()> {
    cargo("cargo test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn run_build() -> Result<()> {
    cargo("cargo build", &["build", "--workspace"])
}

fn run_smoke(seed: u64) -> Result<()> {
    let seed = seed.to_string();
    cargo(
        "forest generation",
        &["run", "-q", "-p", "forestwalk-cli", "--", "generate", "--seed", &seed],
    )?;
    cargo(
        "scripted walk",
        &[
            "run", "-q", "-p", "forestwalk-cli", "--", "walk", "--seed", &seed, "--ticks", "600",
            "--look", "1.5", "--render",
        ],
    )?;
    cargo(
        "turn-scheme walk",
        &[
            "run", "-q", "-p", "forestwalk-cli", "--", "walk", "--seed", &seed, "--scheme", "turn",
            "--view", "third",
        ],
    )
}

fn run_bench() -> Result<()> {
    cargo(
        "kernel bench",
        &["bench", "-p", "forestwalk-kernel", "--bench", "bench_sim_step"],
    )
}
