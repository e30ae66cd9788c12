//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error reading or parsing a configuration file.
    #[error("cannot read configuration file {}: {message}", path.display())]
    Load { path: std::path::PathBuf, message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors supply [`validate`](ConfigValidator::validate); the remaining methods
/// are shared checks used by those implementations.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates image dimensions.
    ///
    /// This method checks that image dimensions are positive.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Image dimensions must be positive".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is positive and finite.
    fn validate_positive_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a usize value is positive.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a per-channel vector has exactly three entries.
    fn validate_rgb_triplet(&self, values: &[f32], field_name: &str) -> Result<(), ConfigError> {
        if values.len() != 3 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must have exactly 3 elements for RGB, got {}",
                    field_name,
                    values.len()
                ),
            });
        }
        if let Some(value) = values.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidConfig {
                message: format!("{} contains a non-finite value: {}", field_name, value),
            });
        }
        Ok(())
    }
}

/// Extension trait wrapping validation failures into [`ClassifierError`](crate::core::ClassifierError).
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates configuration and wraps any errors into `ClassifierError::ConfigError`.
    fn validate_and_wrap(self) -> Result<Self, crate::core::errors::ClassifierError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}

impl From<ConfigError> for crate::core::errors::ClassifierError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
