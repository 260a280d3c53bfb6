//! Configuration validation.

use crate::config::Config;
use crate::constants::confidence;
use crate::error::{Error, Result};
use std::path::Path;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if !(confidence::MIN..=confidence::MAX).contains(&defaults.threshold) {
        return Err(Error::ConfigValidation {
            message: format!(
                "threshold must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                defaults.threshold
            ),
        });
    }

    match (defaults.latitude, defaults.longitude) {
        (Some(lat), Some(lon)) => validate_coordinates(lat, lon)?,
        (None, None) => {}
        _ => {
            return Err(Error::ConfigValidation {
                message: "defaults.latitude and defaults.longitude must be set together"
                    .to_string(),
            });
        }
    }

    Ok(())
}

/// Check that a coordinate pair is on the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::InvalidLatitude { value: latitude });
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::InvalidLongitude { value: longitude });
    }

    Ok(())
}

/// Check that the model and labels files exist.
pub fn validate_model_files(model: &Path, labels: &Path) -> Result<()> {
    if !model.exists() {
        return Err(Error::ModelFileNotFound {
            path: model.to_path_buf(),
        });
    }

    if !labels.exists() {
        return Err(Error::LabelsFileNotFound {
            path: labels.to_path_buf(),
        });
    }

    Ok(())
}
