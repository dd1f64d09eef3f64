//! Location list ingestion
//!
//! Splits the shared run settings and the JSON-encoded location list into one
//! [`LocationRequest`] per location, validating each location once here so
//! nothing downstream has to re-check coordinates.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::models::{Location, LocationRequest, UnitSystem};
use crate::{DigestError, Result};

/// One run's input in workflow form: shared settings plus the location list
/// encoded as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInput {
    pub api_key: String,
    #[serde(default)]
    pub units: Option<String>,
    pub locations: String,
}

/// Parse the JSON-encoded location array.
///
/// Malformed JSON is a [`DigestError::Parse`]; an empty array is valid and
/// yields no locations.
pub fn parse_locations_json(encoded: &str) -> Result<Vec<Location>> {
    let locations: Vec<Location> = serde_json::from_str(encoded)
        .map_err(|e| DigestError::parse(format!("locations is not a valid location list: {e}")))?;
    for location in &locations {
        location.validate()?;
    }
    Ok(locations)
}

/// Fan the shared settings out over the locations, keeping input order.
#[must_use]
pub fn split_locations(
    api_key: &str,
    units: UnitSystem,
    locations: &[Location],
) -> Vec<LocationRequest> {
    locations
        .iter()
        .map(|location| LocationRequest {
            api_key: api_key.to_string(),
            units,
            location: location.clone(),
        })
        .collect()
}

/// Parse a [`WorkflowInput`] into one request per location.
#[instrument(skip(input), fields(units = input.units.as_deref().unwrap_or("us")))]
pub fn parse_workflow_input(input: &WorkflowInput) -> Result<Vec<LocationRequest>> {
    let units = match input.units.as_deref().map(str::trim) {
        None | Some("") => UnitSystem::default(),
        Some(value) => value.parse()?,
    };
    let locations = parse_locations_json(&input.locations)?;
    debug!("Parsed {} location(s)", locations.len());
    Ok(split_locations(&input.api_key, units, &locations))
}
