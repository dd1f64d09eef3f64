//! Unit systems understood by the PirateWeather / Dark Sky API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DigestError;

/// Measurement convention requested from the weather API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Imperial: °F, mph, miles
    #[default]
    Us,
    /// Metric: °C, m/s, km
    Si,
    /// Canadian: °C, km/h, km
    Ca,
    /// British: mph, miles; temperatures are labelled °F
    Uk,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 4] = [UnitSystem::Us, UnitSystem::Si, UnitSystem::Ca, UnitSystem::Uk];

    /// Query value sent to the API
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Us => "us",
            UnitSystem::Si => "si",
            UnitSystem::Ca => "ca",
            UnitSystem::Uk => "uk",
        }
    }

    /// `°C` for `si` and `ca` only; every other system is labelled `°F`.
    #[must_use]
    pub fn temperature_unit(self) -> &'static str {
        match self {
            UnitSystem::Si | UnitSystem::Ca => "°C",
            UnitSystem::Us | UnitSystem::Uk => "°F",
        }
    }

    #[must_use]
    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            UnitSystem::Si => "m/s",
            UnitSystem::Ca => "km/h",
            UnitSystem::Us | UnitSystem::Uk => "mph",
        }
    }

    #[must_use]
    pub fn visibility_unit(self) -> &'static str {
        match self {
            UnitSystem::Si | UnitSystem::Ca => "km",
            UnitSystem::Us | UnitSystem::Uk => "miles",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(UnitSystem::Us),
            "si" => Ok(UnitSystem::Si),
            "ca" => Ok(UnitSystem::Ca),
            "uk" | "uk2" => Ok(UnitSystem::Uk),
            other => Err(DigestError::validation(format!(
                "Unknown unit system '{other}'. Must be one of: us, si, ca, uk"
            ))),
        }
    }
}
