//! CLI definition using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use pneu_types::OutputFormat;

#[derive(Parser)]
#[command(name = "pneu-checker")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Detect swapped and rotated tires by comparing scans against registered tire sets")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a vehicle and its five tires as the baseline
    Register {
        /// License plate (e.g. "ABC-1D23")
        #[arg(long, short = 'p', conflicts_with = "plate_photo")]
        plate: Option<String>,

        /// Photo of the plate to read instead of --plate
        #[arg(long)]
        plate_photo: Option<PathBuf>,

        /// Directory with one photo per position (front-left.jpg, FR.png, ...)
        #[arg(long, conflicts_with = "observations", required_unless_present = "observations")]
        photos: Option<PathBuf>,

        /// JSON file with the five tire observations
        #[arg(long)]
        observations: Option<PathBuf>,

        /// Operator recorded on the baseline
        #[arg(long)]
        operator: Option<String>,
    },

    /// Scan a vehicle's tires and compare them with its baseline
    Verify {
        /// License plate
        plate: String,

        /// Directory with one photo per position
        #[arg(long, conflicts_with = "observations", required_unless_present = "observations")]
        photos: Option<PathBuf>,

        /// JSON file with the five tire observations
        #[arg(long)]
        observations: Option<PathBuf>,

        /// Operator recorded on the verification
        #[arg(long)]
        operator: Option<String>,
    },

    /// Show past verifications of a vehicle
    History {
        /// License plate
        plate: String,
    },

    /// List registered vehicles
    Vehicles,

    /// Show a vehicle's registered tires
    Show {
        /// License plate
        plate: String,
    },

    /// List alerts
    Alerts {
        /// Filter by plate (substring, case-insensitive)
        #[arg(long, short = 'p')]
        plate: Option<String>,

        /// Only alerts waiting for review
        #[arg(long)]
        pending: bool,
    },

    /// Resolve a pending alert after review
    Resolve {
        /// Alert ID
        id: String,

        /// Reviewer notes
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },

    /// Register vehicles from a CSV (plate,position,dot,brand,condition,week,year)
    Import {
        /// CSV file path
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set extractor command
        #[arg(long)]
        set_extractor: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set extraction retries per photo
        #[arg(long)]
        set_retries: Option<u32>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
