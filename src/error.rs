//! Error types and handling for `snowline`

use thiserror::Error;

/// Main error type for the `snowline` library
#[derive(Error, Debug)]
pub enum SnowError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A single upstream call failed in a way retrying will not fix
    #[error("API error: {message}")]
    Api { message: String },

    /// The forecast provider kept failing until the retry budget ran out
    #[error("Upstream unavailable for resort {resort} after {attempts} attempts: {message}")]
    UpstreamUnavailable {
        resort: String,
        attempts: u32,
        message: String,
    },

    /// Lookup of a country or region the dataset does not contain
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// The resort dataset could not be decoded
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SnowError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn upstream_unavailable<R: Into<String>, S: Into<String>>(
        resort: R,
        attempts: u32,
        message: S,
    ) -> Self {
        Self::UpstreamUnavailable {
            resort: resort.into(),
            attempts,
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(kind: &'static str, key: S) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// True for errors a bulk build may log and skip
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. } | Self::Api { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SnowError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            SnowError::Validation { message } => format!("Invalid input: {message}"),
            SnowError::Api { .. } | SnowError::UpstreamUnavailable { .. } => {
                "Unable to reach the weather provider. Please check your internet connection."
                    .to_string()
            }
            SnowError::NotFound { kind, key } => format!("Unknown {kind}: {key}"),
            SnowError::Dataset { .. } => {
                "Resort data could not be read. Please check the dataset file.".to_string()
            }
            SnowError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SnowError::config("bad timezone");
        assert!(matches!(config_err, SnowError::Config { .. }));

        let validation_err = SnowError::validation("invalid coordinates");
        assert!(matches!(validation_err, SnowError::Validation { .. }));

        let upstream = SnowError::upstream_unavailable("42", 6, "connection reset");
        assert!(upstream.is_upstream());
        assert!(upstream.to_string().contains("after 6 attempts"));
    }

    #[test]
    fn test_user_messages() {
        let not_found = SnowError::not_found("country", "Atlantis");
        assert_eq!(not_found.user_message(), "Unknown country: Atlantis");
        assert_eq!(not_found.to_string(), "country not found: Atlantis");

        let api_err = SnowError::api("500");
        assert!(api_err.user_message().contains("Unable to reach"));

        let validation_err = SnowError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SnowError = io_err.into();
        assert!(matches!(err, SnowError::Io { .. }));
        assert!(!err.is_upstream());
    }
}
