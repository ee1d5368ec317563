//! Error types for evosim_core.
//!
//! The tick loop itself does not fail; these cover configuration loading
//! and genome decoding.

use thiserror::Error;

/// Main error type for evosim_core operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An encoded genome could not be decoded
    #[error("Genome decode error: {0}")]
    GenomeDecode(String),
}

/// Result type alias for evosim_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration validation error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a new genome decode error.
    #[must_use]
    pub fn genome_decode<S: Into<String>>(msg: S) -> Self {
        Self::GenomeDecode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::invalid_config("width must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: width must be positive"
        );
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("[world\nwidth = ");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
