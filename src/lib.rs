//! Florascope - flower recognition CLI tool.
//!
//! This crate classifies flower photos with an ONNX image classifier and keeps
//! a store of geo-pins marking where flowers were found.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod output;
pub mod pins;
pub mod pipeline;

use clap::{CommandFactory, Parser};
use cli::{ClassifyArgs, Cli, Command, ConfigAction, PinsAction};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_model_files,
};
use constants::NUM_CLASSES;
use inference::{EngineOptions, FlowerClassifier};
use pins::{FileStore, FixedLocation, LocationProvider, PinStore};
use pipeline::{BatchOptions, PinTarget, classify_files, collect_input_files};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for florascope CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = load_default_config(cli.config.as_deref())?;

    if let Some(command) = cli.command {
        return handle_command(command, &config, cli.config.as_deref(), cli.pins_dir);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    classify_images(
        &cli.inputs,
        &cli.classify,
        &config,
        cli.pins_dir,
        cli.quiet,
    )
}

/// Classify input images with the given options.
fn classify_images(
    inputs: &[PathBuf],
    args: &ClassifyArgs,
    config: &Config,
    pins_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let model_path = args
        .model
        .clone()
        .or_else(|| config.model.path.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no model configured (pass --model or set model.path)".to_string(),
        })?;
    let labels_path = args
        .labels
        .clone()
        .or_else(|| config.model.labels.clone())
        .ok_or_else(|| Error::ConfigValidation {
            message: "no labels configured (pass --labels or set model.labels)".to_string(),
        })?;
    validate_model_files(&model_path, &labels_path)?;

    let files = collect_input_files(inputs)?;
    info!("Found {} image(s) to classify", files.len());

    // Resolve the pin target before loading the model so a missing location fails fast.
    let location = resolve_location(args.lat, args.lon, config)?;
    let store = if args.pin {
        if location.last_known_location().is_none() {
            return Err(Error::LocationUnavailable);
        }
        Some(open_pin_store(config, pins_dir)?)
    } else {
        None
    };
    let target = store.as_ref().map(|store| PinTarget {
        store,
        location: &location,
    });

    let engine_options = EngineOptions {
        device: args.device().unwrap_or(config.inference.device),
        intra_threads: config.inference.intra_threads,
        num_classes: NUM_CLASSES,
    };
    let threshold = args.threshold.unwrap_or(config.defaults.threshold);
    let mut classifier =
        FlowerClassifier::from_files(&model_path, &labels_path, &engine_options, threshold)?;

    let options = BatchOptions {
        format: args.format.unwrap_or(config.defaults.result_format),
        fail_fast: args.fail_fast,
        progress: !quiet,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = classify_files(&mut classifier, &files, options, target.as_ref(), &mut out)?;

    if summary.classified == 0 {
        return Err(Error::Internal {
            message: format!("all {} image(s) failed to classify", summary.failed),
        });
    }
    if summary.failed > 0 {
        warn!("{} image(s) failed to classify", summary.failed);
    }

    Ok(())
}

/// Location from command-line coordinates, falling back to the configured default.
fn resolve_location(lat: Option<f64>, lon: Option<f64>, config: &Config) -> Result<FixedLocation> {
    if lat.is_some() && lon.is_some() {
        return FixedLocation::from_parts(lat, lon);
    }
    FixedLocation::from_parts(config.defaults.latitude, config.defaults.longitude)
}

fn open_pin_store(config: &Config, explicit_dir: Option<PathBuf>) -> Result<PinStore<FileStore>> {
    let dir = match explicit_dir {
        Some(dir) => dir,
        None => config::pins_dir(config)?,
    };
    Ok(PinStore::new(FileStore::new(dir)))
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT is silenced by default since provider fallback warnings are expected in auto mode.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Logs go to stderr so stdout carries only results.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(
    command: Command,
    config: &Config,
    config_path: Option<&Path>,
    pins_dir: Option<PathBuf>,
) -> Result<()> {
    match command {
        Command::Pins { action } => handle_pins_command(action, config, pins_dir),
        Command::Config { action } => handle_config_command(action, config, config_path),
    }
}

#[allow(clippy::print_stdout)]
fn handle_pins_command(
    action: PinsAction,
    config: &Config,
    pins_dir: Option<PathBuf>,
) -> Result<()> {
    let store = open_pin_store(config, pins_dir)?;

    match action {
        PinsAction::Add { label, lat, lon } => {
            let location = resolve_location(lat, lon, config)?;
            let pin = store.add_pin(&location, &label)?;
            println!("Pinned {} at {}", pin.label, pin.coordinates());
            Ok(())
        }
        PinsAction::List { format, output } => {
            let listing = store.listing()?;
            if listing.skipped > 0 {
                warn!("Skipped {} malformed pin(s)", listing.skipped);
            }

            let format = format.unwrap_or(config.defaults.pin_format);
            if let Some(path) = output {
                let mut writer = BufWriter::new(File::create(&path)?);
                output::write_pins(&mut writer, &listing.pins, format)?;
                writer.flush()?;
                info!("Wrote {} pin(s) to {}", listing.pins.len(), path.display());
            } else {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                output::write_pins(&mut out, &listing.pins, format)?;
                out.flush()?;
            }
            Ok(())
        }
        PinsAction::Path => {
            println!("{}", store.inner().dir().display());
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(
    action: ConfigAction,
    config: &Config,
    config_path: Option<&Path>,
) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default(), config_path)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  set [model] path and labels, then run: florascope <IMAGES>...");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|source| Error::ConfigSerialize { source })?;
            println!("{rendered}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
