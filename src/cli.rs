use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Laptop Picker - find the right laptop for what you run
#[derive(Parser)]
#[command(name = "laptop-picker")]
#[command(about = "Questionnaire-driven laptop recommendations with an admin console")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON). Backend URL and key may also come from the environment.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve data from a local JSON snapshot instead of the backend.
    ///
    /// The snapshot maps collection names (`categories`, `laptop_full_info`,
    /// `cpus`, ...) to arrays of rows. Writes made in the admin console stay
    /// in memory.
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Write logs to this file (interactive modes log nowhere otherwise)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive questionnaire (default)
    Wizard,
    /// Run the admin console for CPUs, GPUs, programs and laptops
    Admin {
        /// Tab to open first (cpus, gpus, programs, laptops)
        #[arg(short, long)]
        tab: Option<String>,
    },
    /// Rank laptops for a category and budget without the TUI
    Rank {
        /// Category id or name (e.g. `gaming`); only shown in the summary line
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Budget range id (p1..p5)
        #[arg(short, long, default_value = "p5")]
        budget: String,
        /// Show at most this many laptops
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    CheckConfig {
        /// Path to configuration file to validate
        path: PathBuf,
    },
}
