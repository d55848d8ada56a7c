//! Wheelspin CLI
//!
//! Headless front end for the spin engine: real-time spins with logged
//! boundary ticks, batch simulations, paint plans and config inspection.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wheelspin::{
    config::{ConfigLoader, WheelConfig},
    errors::{SpinError, WheelResult},
    filter::ExclusionFilter,
    presentation::{paint_plan, WheelStyle},
    roster::Roster,
    simulation::SpinSimulator,
    wheel::{LoggingObserver, SpinEngine},
    SpinRequest,
};

/// Wheel of names CLI
#[derive(Parser)]
#[command(name = "wheelspin")]
#[command(about = "Spin a wheel of names with a fair, filterable winner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct EntryArgs {
    /// Comma-separated entries
    #[arg(short, long, value_delimiter = ',')]
    entries: Vec<String>,

    /// File with one entry per line
    #[arg(short = 'f', long, conflicts_with = "entries")]
    entries_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one spin in real time and print the outcome
    Spin {
        #[command(flatten)]
        entries: EntryArgs,

        /// Force the winner by name
        #[arg(short, long)]
        target: Option<String>,

        /// Seed for reproducible spins
        #[arg(short, long)]
        seed: Option<u64>,

        /// Let filtered entries win
        #[arg(long)]
        no_filter: bool,

        /// Drop the winner from the list afterwards
        #[arg(short, long)]
        remove_winner: bool,
    },

    /// Resolve many spins without animation and report the distribution
    Simulate {
        #[command(flatten)]
        entries: EntryArgs,

        /// Number of spins to resolve
        #[arg(short = 'n', long, default_value = "10000")]
        spins: usize,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Let filtered entries win
        #[arg(long)]
        no_filter: bool,
    },

    /// Print the wheel's paint plan
    Segments {
        #[command(flatten)]
        entries: EntryArgs,

        /// Paint excluded entries in their normal colors
        #[arg(long)]
        no_filter: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> WheelResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.monitoring.log_level.as_directive()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Spin {
            entries,
            target,
            seed,
            no_filter,
            remove_winner,
        } => run_spin(config, entries, target, seed, no_filter, remove_winner).await,
        Commands::Simulate {
            entries,
            spins,
            seed,
            no_filter,
        } => run_simulation(config, entries, spins, seed, no_filter),
        Commands::Segments { entries, no_filter } => print_segments(config, entries, no_filter),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_roster(args: &EntryArgs) -> WheelResult<Roster> {
    match &args.entries_file {
        Some(path) => Ok(Roster::from_lines(&std::fs::read_to_string(path)?)),
        None => Ok(Roster::new(
            args.entries
                .iter()
                .map(|entry| entry.trim())
                .filter(|entry| !entry.is_empty()),
        )),
    }
}

fn exclusion_filter(config: &WheelConfig, no_filter: bool) -> ExclusionFilter {
    let mut filter = ExclusionFilter::from_config(&config.filter);
    if no_filter {
        filter.set_enabled(false);
    }
    filter
}

async fn run_spin(
    config: WheelConfig,
    entries: EntryArgs,
    target: Option<String>,
    seed: Option<u64>,
    no_filter: bool,
    remove_winner: bool,
) -> WheelResult<()> {
    let mut roster = load_roster(&entries)?;
    let filter = exclusion_filter(&config, no_filter);

    let request = match target {
        Some(name) => SpinRequest::to_index(roster.target_for(&name, &filter)?),
        None => SpinRequest::random(),
    };

    let engine = match seed {
        Some(seed) => SpinEngine::with_seed(config.spin.clone(), seed)?,
        None => SpinEngine::new(config.spin.clone())?,
    };
    engine.add_observer(std::sync::Arc::new(LoggingObserver::new(config.monitoring.log_ticks)));

    tracing::info!(
        "Spinning {} entries ({} eligible)",
        roster.len(),
        roster.eligible_count(&filter)
    );
    let handle = engine.request_spin(roster.entries(), &filter, request)?;
    let session_id = handle.session_id();

    let outcome = tokio::select! {
        outcome = handle.wait() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            engine.cancel();
            return Err(SpinError::Cancelled { session_id: session_id.to_string() }.into());
        }
    };
    engine.acknowledge();

    if remove_winner {
        let removed = roster.record_winner(&outcome, true);
        tracing::info!("Removed {} entries, {} remain", removed, roster.len());
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_simulation(
    config: WheelConfig,
    entries: EntryArgs,
    spins: usize,
    seed: Option<u64>,
    no_filter: bool,
) -> WheelResult<()> {
    let roster = load_roster(&entries)?;
    let filter = exclusion_filter(&config, no_filter);

    let mut simulator = match seed {
        Some(seed) => SpinSimulator::with_seed(&config.spin, seed)?,
        None => SpinSimulator::new(&config.spin)?,
    };
    let report = simulator.run(roster.entries(), &filter, spins)?;

    tracing::info!("\n{}", report.summary());
    if !report.is_clean() {
        tracing::warn!(
            "Simulation found {} excluded hits and {} landing mismatches",
            report.excluded_hits,
            report.landing_mismatches
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_segments(config: WheelConfig, entries: EntryArgs, no_filter: bool) -> WheelResult<()> {
    let roster = load_roster(&entries)?;
    let filter = exclusion_filter(&config, no_filter);
    let style = WheelStyle::from_config(&config.presentation);

    let plan = paint_plan(roster.entries(), &filter, &style);
    let output = serde_json::json!({
        "style": style,
        "wedges": plan,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
