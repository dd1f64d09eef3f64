//! Error types and handling for `WeatherDigest`

use thiserror::Error;

/// Main error type for the `WeatherDigest` application
#[derive(Error, Debug)]
pub enum DigestError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed input documents (e.g. the JSON-encoded location list)
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Weather API communication errors, tagged with the failing operation
    #[error("API error in {operation}{}: {message}", status_suffix(.status))]
    Api {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Email delivery errors
    #[error("Email error: {message}")]
    Email { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl DigestError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error for `operation` without an HTTP status
    pub fn api<O: Into<String>, S: Into<String>>(operation: O, message: S) -> Self {
        Self::Api {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a new API error carrying the HTTP status the server answered with
    pub fn api_status<O: Into<String>, S: Into<String>>(
        operation: O,
        status: u16,
        message: S,
    ) -> Self {
        Self::Api {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a new email error
    pub fn email<S: Into<String>>(message: S) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// HTTP status attached to an API error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            DigestError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DigestError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            DigestError::Parse { message } => {
                format!("Could not read the location list: {message}")
            }
            DigestError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            DigestError::Api {
                status: Some(401 | 403),
                ..
            } => "The weather API rejected the API key. Please check `weather.api_key`.".to_string(),
            DigestError::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            DigestError::Email { .. } => {
                "Sending the report email failed. Please check your SMTP settings.".to_string()
            }
            DigestError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            DigestError::General { message } => message.clone(),
        }
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(err: serde_json::Error) -> Self {
        DigestError::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = DigestError::config("missing API key");
        assert!(matches!(config_err, DigestError::Config { .. }));

        let parse_err = DigestError::parse("unexpected end of input");
        assert!(matches!(parse_err, DigestError::Parse { .. }));

        let validation_err = DigestError::validation("invalid coordinates");
        assert!(matches!(validation_err, DigestError::Validation { .. }));
    }

    #[test]
    fn test_api_error_display_includes_operation_and_status() {
        let err = DigestError::api_status("fetch_forecast", 503, "service unavailable");
        assert_eq!(
            err.to_string(),
            "API error in fetch_forecast (HTTP 503): service unavailable"
        );
        assert_eq!(err.status(), Some(503));

        let err = DigestError::api("fetch_forecast", "connection reset");
        assert_eq!(err.to_string(), "API error in fetch_forecast: connection reset");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_user_messages() {
        let config_err = DigestError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = DigestError::api("fetch_forecast", "test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let auth_err = DigestError::api_status("fetch_forecast", 401, "unauthorized");
        assert!(auth_err.user_message().contains("API key"));

        let validation_err = DigestError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let err: DigestError = json_err.into();
        assert!(matches!(err, DigestError::Parse { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DigestError = io_err.into();
        assert!(matches!(err, DigestError::Io { .. }));
    }
}
