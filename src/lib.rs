//! `WeatherDigest` - Multi-location weather forecast digests
//!
//! This library fetches forecasts for a list of locations, renders each one
//! as text and HTML, combines them into a single report and delivers it by
//! email, on demand or on a schedule.

pub mod cli;
pub mod combiner;
pub mod config;
pub mod email;
pub mod error;
pub mod formatting;
pub mod location_parser;
pub mod models;
pub mod pipeline;
pub mod schedule;
pub mod telemetry;
pub mod validation;
pub mod weather;

// Re-export core types for public API
pub use combiner::{build_subject, combine_reports};
pub use config::DigestConfig;
pub use email::{ReportSender, SmtpSender};
pub use error::DigestError;
pub use formatting::{FormatOptions, format_location};
pub use location_parser::{WorkflowInput, parse_workflow_input};
pub use models::{CombinedReport, FormattedReport, Location, LocationRequest, UnitSystem};
pub use weather::{ForecastSource, PirateWeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DigestError>;
