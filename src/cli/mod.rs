//! CLI argument parsing.

mod args;
mod validators;

pub use args::{ClassifyArgs, Cli, Command, ConfigAction, PinsAction};
