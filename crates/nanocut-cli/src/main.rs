//! nanocut command-line interface.
//!
//! Cut nanostructures out of bulk crystals described by TOML files:
//! ```sh
//! nanocut cluster.toml cluster.xyz
//! nanocut -f gen -e 30 wire.toml wire.gen
//! nanocut -v slab.toml slab.xyz slab_lattice.txt
//! ```

mod config;
mod runner;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use nanocut_core::RunContext;
use nanocut_geometry::output::{OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(name = "nanocut")]
#[command(about = "Cut finite or periodic nanostructures out of bulk crystals")]
#[command(version)]
struct Cli {
    /// Path to the configuration file.
    config: PathBuf,
    /// File receiving the selected atoms.
    result: PathBuf,
    /// Optional file receiving the periodicity axes, one per line.
    lattice_file: Option<PathBuf>,
    /// Append to the result file instead of overwriting it.
    #[arg(short, long)]
    append: bool,
    /// Report more detail (repeat for more).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Report errors only.
    #[arg(short, long)]
    quiet: bool,
    /// Complete the axes to three vectors, using LENGTH for the missing
    /// orthogonal ones.
    #[arg(short = 'e', long, value_name = "LENGTH", value_parser = positive_length)]
    orthogonal_extension: Option<f64>,
    /// Format of the result file.
    #[arg(short, long, value_enum, default_value_t = Format::Xyz)]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// XYZ with the axes in the comment line.
    Xyz,
    /// DFTB+ gen.
    Gen,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xyz => OutputFormat::Xyz,
            Format::Gen => OutputFormat::Gen,
        }
    }
}

fn positive_length(value: &str) -> Result<f64, String> {
    let length: f64 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if length.is_finite() && length > 0.0 {
        Ok(length)
    } else {
        Err(format!("length must be positive, got {}", length))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let requested = RunContext::from_verbosity(cli.verbose, cli.quiet);
    env_logger::Builder::new()
        .filter_level(requested.level())
        .parse_default_env()
        .init();
    let ctx = RunContext::from_logger();

    let sections = config::load_config(&cli.config)?;
    let options = OutputOptions {
        destination: cli.result,
        append: cli.append,
        format: cli.format.into(),
        lattice_file: cli.lattice_file,
    };
    runner::run(&sections, &options, cli.orthogonal_extension, &ctx)
}
