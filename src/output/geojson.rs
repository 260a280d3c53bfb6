//! GeoJSON export of pins for external map renderers.

use crate::error::{Error, Result};
use crate::pins::PinRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Debug, Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    geometry: Point,
    properties: Properties<'a>,
}

/// GeoJSON positions are `[longitude, latitude]`.
#[derive(Debug, Serialize)]
struct Point {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: [f64; 2],
}

#[derive(Debug, Serialize)]
struct Properties<'a> {
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a PinRecord> for Feature<'a> {
    fn from(pin: &'a PinRecord) -> Self {
        Self {
            kind: "Feature",
            id: &pin.key,
            geometry: Point {
                kind: "Point",
                coordinates: [pin.longitude, pin.latitude],
            },
            properties: Properties {
                label: &pin.label,
                created_at: pin.created_at,
            },
        }
    }
}

/// Write `pins` as a `FeatureCollection` with one Point feature per pin.
pub fn write_geojson<W: Write>(writer: &mut W, pins: &[PinRecord]) -> Result<()> {
    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: pins.iter().map(Feature::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &collection)
        .map_err(|source| Error::JsonWrite { source })?;
    writeln!(writer)?;
    Ok(())
}
