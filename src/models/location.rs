//! Location model for configured places and their coordinates

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::UnitSystem;
use crate::{DigestError, Result};

/// A place the digest reports on
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Display name (city, region, etc.)
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(alias = "latitude", deserialize_with = "coordinate")]
    pub lat: f64,
    /// Longitude in decimal degrees
    #[serde(alias = "longitude", deserialize_with = "coordinate")]
    pub lon: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Format location as the `"lat, lon"` string used in reports
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{}, {}", self.lat, self.lon)
    }

    /// Check name and coordinate ranges
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DigestError::validation("Location name cannot be empty"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(DigestError::validation(format!(
                "Latitude {} for '{}' must be between -90 and 90",
                self.lat, self.name
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(DigestError::validation(format!(
                "Longitude {} for '{}' must be between -180 and 180",
                self.lon, self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.format_coordinates())
    }
}

/// One weather lookup: a location plus the shared API settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRequest {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub units: UnitSystem,
    pub location: Location,
}

/// Coordinates arrive as numeric strings in the JSON location list and as
/// plain numbers in TOML; accept both.
fn coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid coordinate '{text}'"))
        }),
    }
}
