//! CLI argument definitions.

use crate::cli::validators::{parse_label, parse_latitude, parse_longitude, parse_threshold};
use crate::config::{InferenceDevice, PinFormat, ResultFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Recognize flowers in photos and pin where you found them.
#[derive(Debug, Parser)]
#[command(name = "florascope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Classification options.
    #[command(flatten)]
    pub classify: ClassifyArgs,

    /// Configuration file to use instead of the platform default.
    #[arg(long, global = true, env = "FLORASCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding saved pins (overrides config).
    #[arg(long, global = true, env = "FLORASCOPE_PINS_DIR")]
    pub pins_dir: Option<PathBuf>,

    /// Only log warnings and errors, and hide progress bars.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: everything).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage saved pins.
    Pins {
        /// Pins action to perform.
        #[command(subcommand)]
        action: PinsAction,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Pins subcommand actions.
#[derive(Debug, Subcommand)]
pub enum PinsAction {
    /// Save a pin for a flower at the current location.
    Add {
        /// Flower label to pin.
        #[arg(short, long, value_parser = parse_label)]
        label: String,

        /// Latitude of the pin (default: configured location).
        #[arg(long, allow_negative_numbers = true, value_parser = parse_latitude, requires = "lon", env = "FLORASCOPE_LATITUDE")]
        lat: Option<f64>,

        /// Longitude of the pin (default: configured location).
        #[arg(long, allow_negative_numbers = true, value_parser = parse_longitude, requires = "lat", env = "FLORASCOPE_LONGITUDE")]
        lon: Option<f64>,
    },
    /// List saved pins.
    List {
        /// Output format (default: from config).
        #[arg(short, long, value_enum)]
        format: Option<PinFormat>,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the pin storage directory.
    Path,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for classifying images.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClassifyArgs {
    /// Path to ONNX model file (overrides config).
    #[arg(short, long, env = "FLORASCOPE_MODEL")]
    pub model: Option<PathBuf>,

    /// Path to labels file (overrides config).
    #[arg(long, env = "FLORASCOPE_LABELS")]
    pub labels: Option<PathBuf>,

    /// Minimum confidence to report a flower (0.0-1.0).
    #[arg(short, long, value_parser = parse_threshold, env = "FLORASCOPE_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Result output format.
    #[arg(short, long, value_enum, env = "FLORASCOPE_FORMAT")]
    pub format: Option<ResultFormat>,

    /// Pin every recognized flower at the current location.
    #[arg(long)]
    pub pin: bool,

    /// Latitude used for --pin (-90.0 to 90.0).
    #[arg(long, allow_negative_numbers = true, value_parser = parse_latitude, requires = "lon", env = "FLORASCOPE_LATITUDE")]
    pub lat: Option<f64>,

    /// Longitude used for --pin (-180.0 to 180.0).
    #[arg(long, allow_negative_numbers = true, value_parser = parse_longitude, requires = "lat", env = "FLORASCOPE_LONGITUDE")]
    pub lon: Option<f64>,

    /// Prefer GPU execution providers.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,
}

impl ClassifyArgs {
    /// Device requested on the command line, if any.
    pub const fn device(&self) -> Option<InferenceDevice> {
        if self.gpu {
            Some(InferenceDevice::Gpu)
        } else if self.cpu {
            Some(InferenceDevice::Cpu)
        } else {
            None
        }
    }
}
