//! Swivel CLI
//!
//! Simulate structure toggles in a headless world and inspect configuration.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use swivel_runtime::{RuntimeConfig, ToggleAction};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scenario;

use scenario::{SimulationOptions, StructureFile};

#[derive(Parser)]
#[command(name = "swivel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Swivel structure animation engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Toggle a structure in a headless world and print the outcome
    Simulate {
        /// Structure file (TOML)
        structure: PathBuf,

        /// Runtime configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// What the toggle should do
        #[arg(short, long, value_enum, default_value = "toggle")]
        action: ActionArg,

        /// Animation time in seconds
        #[arg(short, long)]
        time: Option<f64>,

        /// Place the final blocks without animating
        #[arg(long)]
        skip: bool,

        /// Move proxies without changing the world
        #[arg(long)]
        preview: bool,

        /// Give up after this many ticks
        #[arg(long, default_value = "100000")]
        max_ticks: u64,
    },

    /// Print the configuration, or validate a configuration file
    Config {
        /// Configuration file to validate
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Start from the testing preset instead of the standard one
        #[arg(long)]
        testing: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Open,
    Close,
    Toggle,
}

impl From<ActionArg> for ToggleAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Open => ToggleAction::Open,
            ActionArg::Close => ToggleAction::Close,
            ActionArg::Toggle => ToggleAction::Toggle,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            structure,
            config,
            action,
            time,
            skip,
            preview,
            max_ticks,
        } => {
            let options = SimulationOptions {
                action: action.into(),
                time,
                skip_animation: skip,
                preview,
                max_ticks,
            };
            cmd_simulate(&structure, config.as_deref(), &options)
        }

        Commands::Config { path, testing } => cmd_config(path.as_deref(), testing),
    }
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::load(path),
        None => Ok(RuntimeConfig::standard()),
    }
}

fn cmd_simulate(structure: &Path, config: Option<&Path>, options: &SimulationOptions) -> Result<()> {
    let file = StructureFile::load(structure)?;
    let config = load_config(config)?;

    let snapshot = &file.structure;
    info!(
        "Simulating {} \"{}\" ({})",
        snapshot.id(),
        snapshot.name(),
        snapshot.archetype().kind()
    );

    let report = scenario::simulate(&file, config, options)?;

    println!("Structure {} \"{}\"", report.before.id(), report.before.name());
    println!("==================");
    println!("Result:  {:?}", report.result);
    println!("Ticks:   {}", report.ticks);
    println!(
        "Cuboid:  {} -> {}",
        report.before.cuboid(),
        report.after.cuboid()
    );
    println!(
        "Open:    {} -> {}",
        report.before.is_open(),
        report.after.is_open()
    );
    println!();
    println!("World:");
    println!("  - blocks placed: {}", report.stats.blocks_placed);
    println!("  - blocks cleared: {}", report.stats.blocks_cleared);
    println!(
        "  - proxies spawned: {} ({} failed)",
        report.stats.proxies_spawned, report.stats.spawn_failures
    );
    println!("  - proxy moves: {}", report.stats.steps + report.stats.teleports);
    println!("  - blocks in final cuboid: {}", report.blocks_in_final);

    Ok(())
}

fn cmd_config(path: Option<&Path>, testing: bool) -> Result<()> {
    let config = match path {
        Some(path) => {
            let config = RuntimeConfig::load(path)?;
            info!("{} is valid", path.display());
            config
        }
        None if testing => RuntimeConfig::testing(),
        None => RuntimeConfig::standard(),
    };

    print!("{}", config.to_toml()?);
    Ok(())
}
