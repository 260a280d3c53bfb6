//! Pin listing writers.

use crate::config::PinFormat;
use crate::error::{Error, Result};
use crate::output::geojson::write_geojson;
use crate::pins::PinRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Pin as it appears in JSON and CSV exports.
#[derive(Debug, Serialize)]
struct PinRow<'a> {
    key: &'a str,
    latitude: f64,
    longitude: f64,
    label: &'a str,
    created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a PinRecord> for PinRow<'a> {
    fn from(pin: &'a PinRecord) -> Self {
        Self {
            key: &pin.key,
            latitude: pin.latitude,
            longitude: pin.longitude,
            label: &pin.label,
            created_at: pin.created_at,
        }
    }
}

/// Write `pins` to `writer` in the requested format.
pub fn write_pins<W: Write>(writer: &mut W, pins: &[PinRecord], format: PinFormat) -> Result<()> {
    match format {
        PinFormat::Text => write_text(writer, pins),
        PinFormat::Json => write_json(writer, pins),
        PinFormat::Csv => write_csv(writer, pins),
        PinFormat::Geojson => write_geojson(writer, pins),
    }
}

fn write_text<W: Write>(writer: &mut W, pins: &[PinRecord]) -> Result<()> {
    if pins.is_empty() {
        writeln!(writer, "No pins saved")?;
        return Ok(());
    }

    for pin in pins {
        let created = pin
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();
        writeln!(
            writer,
            "{:<30} {:>10.5} {:>11.5}  {created}",
            pin.label, pin.latitude, pin.longitude
        )?;
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, pins: &[PinRecord]) -> Result<()> {
    let rows: Vec<PinRow<'_>> = pins.iter().map(PinRow::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &rows).map_err(|source| Error::JsonWrite { source })?;
    writeln!(writer)?;
    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, pins: &[PinRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if pins.is_empty() {
        csv.write_record(["key", "latitude", "longitude", "label", "created_at"])
            .map_err(|source| Error::CsvWrite { source })?;
    }
    for pin in pins {
        csv.serialize(PinRow::from(pin))
            .map_err(|source| Error::CsvWrite { source })?;
    }
    csv.flush()?;
    Ok(())
}
