//! irtsim CLI: generate synthetic IRT data and simulate adaptive tests.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_DIRECTIVES: &str = "irtsim=info,irtsim_core=info,irtsim_report=info";

#[derive(Parser)]
#[command(
    name = "irtsim",
    version,
    about = "Item response theory data generator and adaptive-testing simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic response matrix and its item parameters
    Generate {
        /// Number of simulated students
        #[arg(long)]
        n_students: Option<usize>,

        /// Number of items
        #[arg(long)]
        n_items: Option<usize>,

        /// Response model: 1PL, 2PL or 3PL
        #[arg(long)]
        model: Option<String>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Simulate one adaptive test session
    Adaptive {
        /// Ability of the simulated examinee
        #[arg(long, allow_hyphen_values = true)]
        true_ability: Option<f64>,

        /// Number of items to administer
        #[arg(long)]
        max_items: Option<usize>,

        /// Size of the demonstration item pool
        #[arg(long)]
        pool_size: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render item characteristic curve plots
    Curves {
        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter irtsim.toml
    Init,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            n_students,
            n_items,
            model,
            seed,
            output,
            config,
        } => commands::generate::execute(n_students, n_items, model, seed, output, config),
        Commands::Adaptive {
            true_ability,
            max_items,
            pool_size,
            seed,
            output,
            config,
        } => commands::adaptive::execute(true_ability, max_items, pool_size, seed, output, config),
        Commands::Curves { output, config } => commands::curves::execute(output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
