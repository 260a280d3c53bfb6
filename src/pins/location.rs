//! Device location lookup.

use crate::config::validate_coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, -90.0 to 90.0.
    pub latitude: f64,
    /// Longitude, -180.0 to 180.0.
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values off the globe.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Source of the device's most recent known position.
pub trait LocationProvider {
    /// Last known location, or `None` when no fix is available.
    fn last_known_location(&self) -> Option<Coordinates>;
}

/// Provider answering with a position fixed up front (CLI flags or config).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    coordinates: Option<Coordinates>,
}

impl FixedLocation {
    /// Provider that always reports `coordinates`.
    pub const fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
        }
    }

    /// Provider that never has a fix.
    pub const fn unavailable() -> Self {
        Self { coordinates: None }
    }

    /// Provider built from an optional latitude/longitude pair.
    ///
    /// Both values must be present; a lone latitude or longitude yields no fix.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Self::new(Coordinates::new(lat, lon)?)),
            _ => Ok(Self::unavailable()),
        }
    }
}

impl LocationProvider for FixedLocation {
    fn last_known_location(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_coordinates_validated() {
        assert!(Coordinates::new(52.1, 21.0).is_ok());
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(Error::InvalidLatitude { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, -181.0),
            Err(Error::InvalidLongitude { .. })
        ));
    }

    #[test]
    fn test_fixed_location() {
        let here = Coordinates::new(52.1, 21.0).unwrap();
        assert_eq!(FixedLocation::new(here).last_known_location(), Some(here));
        assert_eq!(FixedLocation::unavailable().last_known_location(), None);
    }

    #[test]
    fn test_from_parts_requires_both() {
        let provider = FixedLocation::from_parts(Some(52.1), None).unwrap();
        assert!(provider.last_known_location().is_none());

        let provider = FixedLocation::from_parts(Some(52.1), Some(21.0)).unwrap();
        assert_eq!(provider.last_known_location().unwrap().latitude, 52.1);

        assert!(FixedLocation::from_parts(Some(120.0), Some(0.0)).is_err());
    }
}
