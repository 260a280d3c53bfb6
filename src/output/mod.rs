//! Output writers and progress reporting.

mod geojson;
mod pins;
pub mod progress;
mod results;

pub use geojson::write_geojson;
pub use pins::write_pins;
pub use results::{write_classification, write_failure};
