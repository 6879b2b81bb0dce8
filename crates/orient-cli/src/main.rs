//! orient: command-line front end for the print-orientation optimizer.
//!
//! Meshes are read from JSON documents holding flat buffers
//! (`{"positions": [...], "indices": [...]}`), suitable for piping out of an
//! upload service or a slicer plugin.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=print_orient=info` - Operation summaries and the chosen orientation
//! - `RUST_LOG=print_orient=debug` - Phase transitions and new best candidates
//! - `RUST_LOG=print_orient::timing=debug` - Performance timing
//! - `RUST_LOG=print_orient::search=trace` - Every candidate evaluation
//!
//! # Example
//!
//! ```bash
//! # Find an orientation within 250 ms and write the re-oriented mesh
//! orient optimize part.json --max-duration-ms 250 -o oriented.json
//!
//! # Inspect overhangs with a given up direction
//! orient --format json overhangs part.json --up 0,0,1 --threshold 50
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use print_orient::{OrientError, OrientationMode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod mesh_io;
mod output;

use commands::{info, optimize, overhangs};

/// orient - Find the best 3D-printing orientation for a mesh.
///
/// Minimizes support material and print height while maximizing bed contact.
#[derive(Parser)]
#[command(name = "orient")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Height penalty profile.
#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Prefer short prints
    Upright,
    /// Halve the height penalty for wide, flat parts
    Flat,
}

impl From<ModeArg> for OrientationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Upright => OrientationMode::Upright,
            ModeArg::Flat => OrientationMode::Flat,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the best print orientation
    Optimize {
        /// Input mesh document (JSON flat buffers)
        input: PathBuf,

        /// Height penalty profile
        #[arg(long, default_value = "upright")]
        mode: ModeArg,

        /// Number of Fibonacci sphere samples (24-200)
        #[arg(long)]
        direction_samples: Option<usize>,

        /// Cap on vertices used for extent measurement (1000-20000)
        #[arg(long)]
        vertex_samples: Option<usize>,

        /// Time budget in milliseconds (unbounded when omitted)
        #[arg(long)]
        max_duration_ms: Option<f64>,

        /// Load options from a TOML file; flags override file values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluate candidates in parallel
        #[arg(long)]
        parallel: bool,

        /// Write the re-oriented mesh to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report overhangs and bed contact for a given rotation
    #[command(group(ArgGroup::new("rotation").required(true).args(["quaternion", "up"])))]
    Overhangs {
        /// Input mesh document (JSON flat buffers)
        input: PathBuf,

        /// Rotation quaternion as w,x,y,z
        #[arg(long, allow_hyphen_values = true)]
        quaternion: Option<String>,

        /// Mesh direction to point up, as x,y,z
        #[arg(long, allow_hyphen_values = true)]
        up: Option<String>,

        /// Overhang angle threshold in degrees
        #[arg(long, default_value = "45.0")]
        threshold: f64,

        /// List overhang and contact triangle indices
        #[arg(long)]
        list: bool,
    },

    /// Display mesh statistics and principal axes
    Info {
        /// Input mesh document (JSON flat buffers)
        input: PathBuf,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "print_orient=info,orient=info",
            2 => "print_orient=debug,orient=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Optimize {
            input,
            mode,
            direction_samples,
            vertex_samples,
            max_duration_ms,
            config,
            parallel,
            output,
        } => optimize::run(
            input,
            optimize::OptimizeArgs {
                mode: (*mode).into(),
                direction_samples: *direction_samples,
                vertex_samples: *vertex_samples,
                max_duration_ms: *max_duration_ms,
                config: config.as_deref(),
                parallel: *parallel,
                output: output.as_deref(),
            },
            &cli,
        ),
        Commands::Overhangs {
            input,
            quaternion,
            up,
            threshold,
            list,
        } => overhangs::run(
            input,
            quaternion.as_deref(),
            up.as_deref(),
            *threshold,
            *list,
            &cli,
        ),
        Commands::Info { input } => info::run(input, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(orient_err) = e.chain().find_map(|c| c.downcast_ref::<OrientError>()) {
                eprintln!("{}: {}", "Error".red().bold(), e);
                eprintln!("  {}: {}", "Code".cyan(), orient_err.code());
                if let Some(help) = miette::Diagnostic::help(orient_err) {
                    eprintln!("  {}: {}", "Suggestion".green(), help);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
