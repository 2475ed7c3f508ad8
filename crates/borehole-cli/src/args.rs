//! Command-line argument definitions for the borehole CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the snapshot to survey, override the
//! reference borehole and its elevation, and control export, configuration
//! and logging.

use clap::Parser;

/// Command-line arguments for the borehole survey tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the entity snapshot
    #[arg(help = "Path to the entity snapshot (.toml)")]
    pub input: String,

    /// Identifier of the reference borehole
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Elevation to use for the reference when the drawing has none
    #[arg(short = 'z', long, allow_negative_numbers = true)]
    pub reference_z: Option<f64>,

    /// Write the results to this TOML file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
