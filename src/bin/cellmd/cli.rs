use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Parser)]
#[command(
    name = "cellmd",
    about = "Cell-list Lennard-Jones molecular dynamics in two dimensions",
    version,
    author,
    before_help = crate::display::banner_for_help()
)]
pub struct Cli {
    /// Load run parameters from a TOML file (flags override its values)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub grid: GridOptions,

    #[command(flatten)]
    pub time: TimeOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    /// Print the run parameters and enable info-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the banner and progress bar (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Domain and particle setup.
#[derive(Args)]
#[command(next_help_heading = "Domain")]
pub struct GridOptions {
    /// Number of cells along x [default: 500]
    #[arg(short = 'x', long = "cellx", value_name = "N")]
    pub cells_x: Option<usize>,

    /// Number of cells along y [default: 500]
    #[arg(short = 'y', long = "celly", value_name = "N")]
    pub cells_y: Option<usize>,

    /// Lattice particles per cell per dimension [default: 2]
    #[arg(short = 'p', long = "parts-per-dim", value_name = "N")]
    pub particles_per_dim: Option<usize>,

    /// Cell edge length [default: 2.5]
    #[arg(short = 's', long = "cellsize", value_name = "LEN")]
    pub cell_size: Option<f64>,

    /// Interaction cutoff radius, at most the cell size [default: 2.5]
    #[arg(short = 'r', long = "cutoff", value_name = "LEN")]
    pub cutoff: Option<f64>,

    /// Initial temperature [default: 1.0]
    #[arg(long = "temp", value_name = "T")]
    pub temperature: Option<f64>,

    /// Seed for initial velocity directions [default: 100]
    #[arg(short = 'e', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Integration length and resolution.
#[derive(Args)]
#[command(next_help_heading = "Time Integration")]
pub struct TimeOptions {
    /// Simulated end time [default: 0.5]
    #[arg(short = 't', long = "endtime", value_name = "TIME")]
    pub end_time: Option<f64>,

    /// Number of steps [default: 1000]
    #[arg(short = 'i', long = "iters", value_name = "N")]
    pub iterations: Option<usize>,

    /// Explicit timestep; the step count becomes ceil(endtime / del-t)
    #[arg(short = 'd', long = "del-t", value_name = "DT", conflicts_with = "iterations")]
    pub time_step: Option<f64>,
}

/// Status reporting and snapshot files.
#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Report status (and checkpoint, if enabled) every N steps
    #[arg(short = 'f', long = "freq", value_name = "N", default_value = "100")]
    pub frequency: NonZeroUsize,

    /// Disable all file output
    #[arg(short = 'n', long = "noio")]
    pub no_io: bool,

    /// Basename for output files
    #[arg(short = 'o', long = "output", value_name = "BASENAME", default_value = cellmd::io::DEFAULT_BASENAME)]
    pub basename: String,

    /// Write a snapshot at every report
    #[arg(short = 'c', long = "checkpoint")]
    pub checkpoint: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
