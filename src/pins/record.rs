//! Pin record encoding.
//!
//! Records are stored as JSON objects. Entries written by older releases use
//! the `lat,lon,label` text form and are still readable.

use crate::constants::pins::LEGACY_DELIMITER;
use crate::error::{Error, Result};
use crate::pins::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A labeled location saved by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    /// Store key; not part of the encoded value.
    #[serde(skip)]
    pub key: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Flower label the pin was created for.
    pub label: String,
    /// Creation time; absent for legacy entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PinRecord {
    /// New record stamped with the current time.
    pub fn new(key: String, coordinates: Coordinates, label: &str) -> Self {
        Self {
            key,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            label: label.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// Position of the pin.
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Encode the record value for storage.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| Error::PinEncode { source })
    }

    /// Decode a stored value read under `key`.
    pub fn decode(key: &str, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let mut record = if raw.starts_with('{') {
            serde_json::from_str::<Self>(raw).map_err(|e| malformed(key, e.to_string()))?
        } else {
            decode_legacy(key, raw)?
        };

        if Coordinates::new(record.latitude, record.longitude).is_err() {
            return Err(malformed(
                key,
                format!(
                    "coordinates out of range ({}, {})",
                    record.latitude, record.longitude
                ),
            ));
        }

        record.key = key.to_string();
        Ok(record)
    }
}

fn decode_legacy(key: &str, raw: &str) -> Result<PinRecord> {
    let fields: Vec<&str> = raw.split(LEGACY_DELIMITER).collect();
    let [lat, lon, label] = fields.as_slice() else {
        return Err(malformed(
            key,
            format!("expected 3 comma-separated fields, found {}", fields.len()),
        ));
    };

    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(key, format!("latitude '{}' is not a number", lat.trim())))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(key, format!("longitude '{}' is not a number", lon.trim())))?;

    Ok(PinRecord {
        key: String::new(),
        latitude,
        longitude,
        label: label.trim().to_string(),
        created_at: None,
    })
}

fn malformed(key: &str, reason: String) -> Error {
    Error::MalformedPin {
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn rose() -> PinRecord {
        PinRecord::new(
            "pin_1".to_string(),
            Coordinates::new(52.1, 21.0).unwrap(),
            "Rose",
        )
    }

    #[test]
    fn test_encode_omits_key() {
        let encoded = rose().encode().unwrap();
        assert!(!encoded.contains("pin_1"));
        assert!(encoded.contains("\"label\":\"Rose\""));
    }

    #[test]
    fn test_decode_encoded_record() {
        let original = rose();
        let decoded = PinRecord::decode("pin_1", &original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_label_with_comma_survives() {
        let record = PinRecord::new(
            "pin_2".to_string(),
            Coordinates::new(10.0, 20.0).unwrap(),
            "Lily, tiger",
        );
        let decoded = PinRecord::decode("pin_2", &record.encode().unwrap()).unwrap();
        assert_eq!(decoded.label, "Lily, tiger");
    }

    #[test]
    fn test_decode_legacy_triple() {
        let record = PinRecord::decode("1700000000000", "52.1,21.0,Rose").unwrap();
        assert_eq!(record.latitude, 52.1);
        assert_eq!(record.longitude, 21.0);
        assert_eq!(record.label, "Rose");
        assert_eq!(record.key, "1700000000000");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_decode_legacy_non_numeric() {
        let result = PinRecord::decode("k", "abc,21.0,Rose");
        assert!(matches!(result, Err(Error::MalformedPin { .. })));
    }

    #[test]
    fn test_decode_legacy_wrong_field_count() {
        assert!(matches!(
            PinRecord::decode("k", "52.1,21.0"),
            Err(Error::MalformedPin { .. })
        ));
        assert!(matches!(
            PinRecord::decode("k", "52.1,21.0,Lily,tiger"),
            Err(Error::MalformedPin { .. })
        ));
    }

    #[test]
    fn test_decode_bad_json() {
        let result = PinRecord::decode("k", "{\"latitude\": 1.0");
        assert!(matches!(result, Err(Error::MalformedPin { .. })));
    }

    #[test]
    fn test_decode_out_of_range() {
        let result = PinRecord::decode("k", "95.0,21.0,Rose");
        assert!(matches!(result, Err(Error::MalformedPin { .. })));
    }
}
