//! Data models for the WeatherDigest application
//!
//! This module contains the core domain models organized by concern:
//! - Location: configured places and their coordinates
//! - Units: the unit system requested from the weather API
//! - Forecast: the raw forecast payload as returned by the API
//! - Report: formatted per-location reports and the combined digest

pub mod forecast;
mod lenient;
pub mod location;
pub mod report;
pub mod units;

// Re-export all public types for convenient access
pub use forecast::{CurrentConditions, DailyPoint, DataBlock, HourlyPoint, RawForecast};
pub use location::{Location, LocationRequest};
pub use report::{CombinedReport, FormattedReport};
pub use units::UnitSystem;
